//! `Cell`: a dynamically-typed value over the closed tag set, expressed as
//! a tagged sum rather than a class hierarchy. Every other crate works with
//! concrete, statically-typed cell kinds (`Block`, `Order`,
//! `Vector<AccountStatus>`, ...) dispatched through Rust's own type system
//! rather than a runtime tag; `Cell` exists only for the one place that
//! needs a *heterogeneous* collection of cells — `State.globals` — where the
//! element type is not known ahead of time.
//!
//! Only the scalar kinds plus recursive vectors are represented here. The
//! aggregate kinds with their own concrete generic types elsewhere (map,
//! set, blob-map, signed-data, every record) have no `globals` use case
//! driving them, and re-deriving them generically over `Cell` would just
//! duplicate `cc_02_collections`'s and `cc_04_state`'s existing encodings
//! without a caller; see `DESIGN.md` for this scope call.

use crate::codec::{Decode, Encode};
use crate::error::CodecError;
use crate::tag::Tag;
use crate::varint::{read_uvlq, write_uvlq};

/// A dynamically-typed cell value (the closed tag set's scalar + vector
/// subset).
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Nil,
    Bool(bool),
    Long(i64),
    Double(f64),
    Char(char),
    Str(String),
    Blob(Vec<u8>),
    Vector(Vec<Cell>),
}

impl Encode for Cell {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Cell::Nil => ().encode(out),
            Cell::Bool(b) => b.encode(out),
            Cell::Long(n) => n.encode(out),
            Cell::Double(d) => d.encode(out),
            Cell::Char(c) => c.encode(out),
            Cell::Str(s) => s.encode(out),
            Cell::Blob(b) => b.encode(out),
            Cell::Vector(items) => {
                out.push(Tag::Vector as u8);
                write_uvlq(items.len() as u64, out);
                for item in items {
                    item.encode(out);
                }
            }
        }
    }
}

impl Decode for Cell {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let tag_byte = *input.first().ok_or_else(|| CodecError::BadFormat("empty cell".into()))?;
        let tag = Tag::from_u8(tag_byte).ok_or(CodecError::BadFormat(format!("unknown cell tag {tag_byte}")))?;
        match tag {
            Tag::Nil => <()>::decode(input).map(|(_, n)| (Cell::Nil, n)),
            Tag::Bool => bool::decode(input).map(|(v, n)| (Cell::Bool(v), n)),
            Tag::Long => i64::decode(input).map(|(v, n)| (Cell::Long(v), n)),
            Tag::Double => f64::decode(input).map(|(v, n)| (Cell::Double(v), n)),
            Tag::Char => char::decode(input).map(|(v, n)| (Cell::Char(v), n)),
            Tag::Str => String::decode(input).map(|(v, n)| (Cell::Str(v), n)),
            Tag::Blob => Vec::<u8>::decode(input).map(|(v, n)| (Cell::Blob(v), n)),
            Tag::Vector => {
                let mut pos = 1;
                let (count, consumed) = read_uvlq(&input[pos..])?;
                pos += consumed;
                let mut items = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let (item, n) = Cell::decode(&input[pos..])?;
                    pos += n;
                    items.push(item);
                }
                Ok((Cell::Vector(items), pos))
            }
            other => Err(CodecError::BadFormat(format!("cell tag {other:?} not representable as a dynamic Cell"))),
        }
    }
}
