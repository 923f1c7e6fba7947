//! `Block`: a timestamped batch of signed transactions proposed by one peer
//!.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::refs::Ref;
use cc_01_encoding::tag::{RecordTag, Tag};
use cc_01_encoding::varint::{read_ivlq, write_ivlq};
use cc_02_collections::Vector;
use shared_types::{AccountKey, Hash};

use crate::signed::SignedData;
use crate::transaction::Transaction;

/// A peer's proposed batch of transactions at a point in time.
#[derive(Clone)]
pub struct Block {
    timestamp: i64,
    peer_key: AccountKey,
    transactions: Vector<SignedData<Transaction>>,
}

impl Block {
    /// Construct a block. `timestamp` is the peer's wall-clock time at
    /// proposal (milliseconds since epoch, monotone per peer).
    pub fn new(timestamp: i64, peer_key: AccountKey, transactions: Vector<SignedData<Transaction>>) -> Block {
        Block { timestamp, peer_key, transactions }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn peer_key(&self) -> AccountKey {
        self.peer_key
    }

    pub fn transactions(&self) -> &Vector<SignedData<Transaction>> {
        &self.transactions
    }

    /// Content hash of this block's canonical encoding, used to break ties
    /// between equally-weighted chains.
    pub fn hash(&self) -> Hash {
        Hash::from_bytes(shared_crypto::hashing::blake3_hash(&self.to_bytes()))
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}
impl Eq for Block {}

impl Encode for Block {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Record as u8);
        out.push(RecordTag::Block as u8);
        write_ivlq(self.timestamp, out);
        out.extend_from_slice(self.peer_key.as_bytes());
        Ref::of(self.transactions.clone()).encode(out);
    }
}

impl Decode for Block {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::Block)?;
        let (timestamp, n) = read_ivlq(&input[pos..])?;
        pos += n;
        let key_bytes = input
            .get(pos..pos + 32)
            .ok_or_else(|| CodecError::BadFormat("truncated block peer key".into()))?;
        let mut key = [0u8; 32];
        key.copy_from_slice(key_bytes);
        pos += 32;
        let (transactions, n) = Ref::<Vector<SignedData<Transaction>>>::decode(&input[pos..])?;
        pos += n;
        let transactions = match transactions {
            Ref::Embedded(v) => v,
            Ref::Indirect(_) => {
                return Err(CodecError::BadFormat("block transactions ref is indirect in bare decode".into()))
            }
        };
        Ok((Block { timestamp, peer_key: AccountKey::from_bytes(key), transactions }, pos))
    }
}

/// Read a `(Tag::Record, RecordTag)` header, returning the byte offset past
/// it. Shared by every record type in this crate.
pub(crate) fn expect_record(input: &[u8], want: RecordTag) -> Result<usize, CodecError> {
    match input.first() {
        Some(&b) if b == Tag::Record as u8 => {}
        Some(_) => return Err(CodecError::BadFormat("expected Record tag".into())),
        None => return Err(CodecError::BadFormat("empty input".into())),
    }
    match input.get(1) {
        Some(&b) if b == want as u8 => Ok(2),
        Some(_) => Err(CodecError::BadFormat(format!("expected record kind {:?}", want))),
        None => Err(CodecError::BadFormat("truncated record header".into())),
    }
}
