//! Canonical encodings for the identity cell kinds: `AccountKey` (an
//! Ed25519 public key) and `Address` (an account index).

use crate::codec::{Decode, Encode};
use crate::error::CodecError;
use crate::tag::Tag;
use crate::varint::{read_uvlq, write_uvlq};
use shared_types::{Address, AccountKey};

impl Encode for AccountKey {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::AccountKey as u8);
        out.extend_from_slice(self.as_bytes());
    }
}

impl Decode for AccountKey {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        match input.first() {
            Some(&b) if b == Tag::AccountKey as u8 => {}
            Some(_) => return Err(CodecError::BadFormat("expected AccountKey tag".into())),
            None => return Err(CodecError::BadFormat("empty input".into())),
        }
        let bytes = input
            .get(1..33)
            .ok_or_else(|| CodecError::BadFormat("truncated account key".into()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok((AccountKey::from_bytes(arr), 33))
    }
}

/// The `Address` cell kind: a VLQ-encoded account index.
impl Encode for Address {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Address as u8);
        write_uvlq(self.index(), out);
    }
}

impl Decode for Address {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        match input.first() {
            Some(&b) if b == Tag::Address as u8 => {}
            Some(_) => return Err(CodecError::BadFormat("expected Address tag".into())),
            None => return Err(CodecError::BadFormat("empty input".into())),
        }
        let (index, n) = read_uvlq(&input[1..])?;
        Ok((Address::new(index), n + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_key_roundtrips() {
        let k = AccountKey::from_bytes([3u8; 32]);
        let bytes = k.to_bytes();
        let (decoded, n) = AccountKey::decode(&bytes).unwrap();
        assert_eq!(decoded, k);
        assert_eq!(n, bytes.len());
    }

    #[test]
    fn address_roundtrips() {
        let a = Address::new(12345);
        let bytes = a.to_bytes();
        let (decoded, n) = Address::decode(&bytes).unwrap();
        assert_eq!(decoded, a);
        assert_eq!(n, bytes.len());
    }
}
