//! `Encode`/`Decode`: the capability every cell kind implements.
//!
//! This is the concrete shape of the "tagged sum with encode/decode/hash"
//! interface a polymorphic cell hierarchy collapses to: dispatch by tag byte
//! on decode, by variant on encode, no inheritance required.

use crate::error::CodecError;
use crate::tag::Tag;
use crate::varint::{read_ivlq, read_uvlq, write_ivlq, write_uvlq};

/// Produce the canonical byte encoding of a cell.
pub trait Encode {
    /// Append this cell's canonical encoding to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Size of this cell's canonical encoding, in bytes.
    fn encoded_size(&self) -> usize {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf.len()
    }

    /// Encode into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

/// Parse a cell's canonical encoding back into a value.
pub trait Decode: Sized {
    /// Decode a value from the front of `input`, returning it along with
    /// the number of bytes consumed.
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError>;
}

fn expect_tag(input: &[u8], want: Tag) -> Result<usize, CodecError> {
    match input.first() {
        None => Err(CodecError::BadFormat("empty input".into())),
        Some(&b) if b == want as u8 => Ok(1),
        Some(&b) => Err(CodecError::BadFormat(format!(
            "expected tag {:?} ({}), got {}",
            want, want as u8, b
        ))),
    }
}

impl Encode for () {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Nil as u8);
    }
}

impl Decode for () {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        expect_tag(input, Tag::Nil).map(|n| ((), n))
    }
}

impl Encode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Bool as u8);
        out.push(u8::from(*self));
    }
}

impl Decode for bool {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let n = expect_tag(input, Tag::Bool)?;
        match input.get(n) {
            Some(0) => Ok((false, n + 1)),
            Some(1) => Ok((true, n + 1)),
            Some(_) => Err(CodecError::BadFormat("bool byte not 0/1".into())),
            None => Err(CodecError::BadFormat("truncated bool".into())),
        }
    }
}

/// The `Long` cell kind: a canonical signed 64-bit integer.
impl Encode for i64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Long as u8);
        write_ivlq(*self, out);
    }
}

impl Decode for i64 {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let n = expect_tag(input, Tag::Long)?;
        let (v, consumed) = read_ivlq(&input[n..])?;
        Ok((v, n + consumed))
    }
}

/// The `Double` cell kind: IEEE-754 big-endian, so byte order is canonical
/// regardless of host endianness.
impl Encode for f64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Double as u8);
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Decode for f64 {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let n = expect_tag(input, Tag::Double)?;
        let bytes = input
            .get(n..n + 8)
            .ok_or_else(|| CodecError::BadFormat("truncated double".into()))?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok((f64::from_be_bytes(arr), n + 8))
    }
}

impl Encode for char {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Char as u8);
        write_uvlq(u64::from(*self as u32), out);
    }
}

impl Decode for char {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let n = expect_tag(input, Tag::Char)?;
        let (code, consumed) = read_uvlq(&input[n..])?;
        let code = u32::try_from(code).map_err(|_| CodecError::BadFormat("char out of range".into()))?;
        let c = char::from_u32(code).ok_or_else(|| CodecError::BadFormat("invalid char codepoint".into()))?;
        Ok((c, n + consumed))
    }
}

/// The `String` cell kind: length-prefixed UTF-8.
impl Encode for String {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Str as u8);
        write_uvlq(self.len() as u64, out);
        out.extend_from_slice(self.as_bytes());
    }
}

impl Decode for String {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let n = expect_tag(input, Tag::Str)?;
        let (len, consumed) = read_uvlq(&input[n..])?;
        let start = n + consumed;
        let end = start
            .checked_add(len as usize)
            .ok_or_else(|| CodecError::BadFormat("string length overflow".into()))?;
        let bytes = input
            .get(start..end)
            .ok_or_else(|| CodecError::BadFormat("truncated string".into()))?;
        let s = std::str::from_utf8(bytes)
            .map_err(|_| CodecError::BadFormat("string not valid utf-8".into()))?
            .to_owned();
        Ok((s, end))
    }
}

/// The `Blob` cell kind: length-prefixed raw bytes.
impl Encode for Vec<u8> {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Blob as u8);
        write_uvlq(self.len() as u64, out);
        out.extend_from_slice(self);
    }
}

impl Decode for Vec<u8> {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let n = expect_tag(input, Tag::Blob)?;
        let (len, consumed) = read_uvlq(&input[n..])?;
        let start = n + consumed;
        let end = start
            .checked_add(len as usize)
            .ok_or_else(|| CodecError::BadFormat("blob length overflow".into()))?;
        let bytes = input
            .get(start..end)
            .ok_or_else(|| CodecError::BadFormat("truncated blob".into()))?;
        Ok((bytes.to_vec(), end))
    }
}
