//! `Ref<T>`: a child reference that is either embedded inline or indirect
//! through a content hash.

use crate::codec::{Decode, Encode};
use crate::error::CodecError;
use crate::tag::Tag;
use shared_types::Hash;

/// Above this many encoded bytes, a cell is referenced indirectly (by hash)
/// rather than embedded inline in its parent.
pub const MAX_EMBEDDED: usize = 140;

/// `encodedSize(x) <= MaxEmbedded`.
pub fn is_embedded(encoded_size: usize) -> bool {
    encoded_size <= MAX_EMBEDDED
}

/// A reference to a child cell: inline if small, hash-only if large.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref<T> {
    /// The child's value, carried inline.
    Embedded(T),
    /// Only the child's content hash; the value must be resolved through a
    /// store.
    Indirect(Hash),
}

impl<T: Encode> Ref<T> {
    /// Build a ref for `value`, embedding it if small enough or else
    /// computing its content hash.
    pub fn of(value: T) -> Ref<T> {
        let bytes = value.to_bytes();
        if is_embedded(bytes.len()) {
            Ref::Embedded(value)
        } else {
            Ref::Indirect(Hash::from_bytes(shared_crypto::hashing::blake3_hash(&bytes)))
        }
    }

    /// Force construction of an indirect ref regardless of size, used by
    /// `persist` once a value's bytes have been written to a store.
    pub fn indirect_of(value: &T) -> Ref<T> {
        let bytes = value.to_bytes();
        Ref::Indirect(Hash::from_bytes(shared_crypto::hashing::blake3_hash(&bytes)))
    }

    /// The content hash this ref resolves to, computing it from the
    /// embedded value if necessary.
    pub fn hash(&self) -> Hash {
        match self {
            Ref::Embedded(v) => Hash::from_bytes(shared_crypto::hashing::blake3_hash(&v.to_bytes())),
            Ref::Indirect(h) => *h,
        }
    }

    /// `true` if this ref carries its value inline.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Ref::Embedded(_))
    }
}

impl<T: Encode> Encode for Ref<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Ref::Embedded(v) => v.encode(out),
            Ref::Indirect(h) => {
                out.push(Tag::RefIndirect as u8);
                out.extend_from_slice(h.as_bytes());
            }
        }
    }
}

impl<T: Decode> Decode for Ref<T> {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        match input.first() {
            Some(&b) if b == Tag::RefIndirect as u8 => {
                let bytes = input
                    .get(1..33)
                    .ok_or_else(|| CodecError::BadFormat("truncated ref-indirect".into()))?;
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                Ok((Ref::Indirect(Hash::from_bytes(arr)), 33))
            }
            Some(_) => {
                let (v, n) = T::decode(input)?;
                Ok((Ref::Embedded(v), n))
            }
            None => Err(CodecError::BadFormat("empty ref".into())),
        }
    }
}
