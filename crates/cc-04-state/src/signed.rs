//! `SignedData<T>`: a tuple `(publicKey, signature, payloadRef)` and the
//! `sign`/`verify` operations over it.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::refs::Ref;
use cc_01_encoding::tag::Tag;
use shared_crypto::signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use shared_types::{AccountKey, Signature};

use crate::error::StateError;

/// A cell paired with an Ed25519 signature over its payload ref's encoding,
/// and the public key the signature is claimed to be from.
#[derive(Clone)]
pub struct SignedData<T> {
    public_key: AccountKey,
    signature: Signature,
    payload: Ref<T>,
}

impl<T: Encode + Clone> SignedData<T> {
    /// The signer's public key, unverified.
    pub fn public_key(&self) -> AccountKey {
        self.public_key
    }

    /// The signed payload, unverified.
    pub fn payload(&self) -> &Ref<T> {
        &self.payload
    }

    /// The value, assuming the payload ref is embedded (no store needed).
    /// Returns `None` for an indirect ref the caller must resolve through a
    /// [`cc_03_store`]-style store instead.
    pub fn value(&self) -> Option<&T> {
        match &self.payload {
            Ref::Embedded(v) => Some(v),
            Ref::Indirect(_) => None,
        }
    }

    /// Sign `value` with `keypair`: `(publicKey, ed25519(encoding(cell)),
    /// refToCell)`. The signature covers the encoded bytes of
    /// the payload *ref*, not the bare value, so embedded and indirect
    /// payloads of the same logical value sign identically only when their
    /// ref encodings match.
    pub fn sign(keypair: &Ed25519KeyPair, value: T) -> SignedData<T> {
        let payload = Ref::of(value);
        let message = payload.to_bytes();
        let sig = keypair.sign(&message);
        SignedData {
            public_key: AccountKey::from_bytes(*keypair.public_key().as_bytes()),
            signature: Signature::from_bytes(*sig.as_bytes()),
            payload,
        }
    }

    /// Verify the signature against the claimed public key. Decodes the
    /// ref, hashes its encoding, and checks Ed25519 per RFC 8032.
    pub fn verify(&self) -> Result<(), StateError> {
        let message = self.payload.to_bytes();
        let pubkey =
            Ed25519PublicKey::from_bytes(*self.public_key.as_bytes()).map_err(|_| StateError::BadSignature)?;
        let sig = Ed25519Signature::from_bytes(*self.signature.as_bytes());
        pubkey.verify(&message, &sig).map_err(|_| StateError::BadSignature)
    }
}

impl<T: Encode + Clone> Encode for SignedData<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::SignedData as u8);
        out.extend_from_slice(self.public_key.as_bytes());
        out.extend_from_slice(self.signature.as_bytes());
        self.payload.encode(out);
    }
}

impl<T: Decode + Encode + Clone> Decode for SignedData<T> {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        match input.first() {
            Some(&b) if b == Tag::SignedData as u8 => {}
            Some(_) => return Err(CodecError::BadFormat("expected SignedData tag".into())),
            None => return Err(CodecError::BadFormat("empty input".into())),
        }
        let mut pos = 1usize;
        let pk_bytes = input
            .get(pos..pos + 32)
            .ok_or_else(|| CodecError::BadFormat("truncated signed-data public key".into()))?;
        let mut pk = [0u8; 32];
        pk.copy_from_slice(pk_bytes);
        pos += 32;
        let sig_bytes = input
            .get(pos..pos + 64)
            .ok_or_else(|| CodecError::BadFormat("truncated signed-data signature".into()))?;
        let mut sig = [0u8; 64];
        sig.copy_from_slice(sig_bytes);
        pos += 64;
        let (payload, n) = Ref::<T>::decode(&input[pos..])?;
        pos += n;
        Ok((
            SignedData {
                public_key: AccountKey::from_bytes(pk),
                signature: Signature::from_bytes(sig),
                payload,
            },
            pos,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let kp = Ed25519KeyPair::generate();
        let signed = SignedData::sign(&kp, 42i64);
        assert!(signed.verify().is_ok());
        assert_eq!(signed.value(), Some(&42i64));
    }

    #[test]
    fn tampered_public_key_fails_verification() {
        let kp = Ed25519KeyPair::generate();
        let other = Ed25519KeyPair::generate();
        let mut signed = SignedData::sign(&kp, 42i64);
        signed.public_key = AccountKey::from_bytes(*other.public_key().as_bytes());
        assert!(signed.verify().is_err());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let kp = Ed25519KeyPair::generate();
        let signed = SignedData::sign(&kp, "order".to_owned());
        let bytes = signed.to_bytes();
        let (decoded, n) = SignedData::<String>::decode(&bytes).unwrap();
        assert_eq!(n, bytes.len());
        assert!(decoded.verify().is_ok());
        assert_eq!(decoded.value(), Some(&"order".to_owned()));
    }
}
