//! `AccountStatus` and `PeerStatus`: the two record kinds held in
//! `State.accounts` and `State.peers`.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::tag::{RecordTag, Tag};
use cc_01_encoding::varint::{read_ivlq, write_ivlq};

use crate::block::expect_record;

/// An account's balance and transaction sequence counter.
///
/// `sequence` is the number of transactions this account has successfully
/// submitted; a submitted transaction's own `sequence` must equal the
/// account's current `sequence` plus one: after one transaction each from
/// a zero genesis, every account's sequence reads back as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountStatus {
    balance: i64,
    sequence: i64,
}

impl AccountStatus {
    pub fn new(balance: i64, sequence: i64) -> AccountStatus {
        AccountStatus { balance, sequence }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn with_balance(&self, balance: i64) -> AccountStatus {
        AccountStatus { balance, sequence: self.sequence }
    }

    pub fn with_next_sequence(&self) -> AccountStatus {
        AccountStatus { balance: self.balance, sequence: self.sequence + 1 }
    }
}

impl Encode for AccountStatus {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Record as u8);
        out.push(RecordTag::AccountStatus as u8);
        write_ivlq(self.balance, out);
        write_ivlq(self.sequence, out);
    }
}

impl Decode for AccountStatus {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::AccountStatus)?;
        let (balance, n) = read_ivlq(&input[pos..])?;
        pos += n;
        let (sequence, n) = read_ivlq(&input[pos..])?;
        pos += n;
        Ok((AccountStatus { balance, sequence }, pos))
    }
}

/// A peer's stake weight in the consensus vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerStatus {
    stake: i64,
}

impl PeerStatus {
    pub fn new(stake: i64) -> PeerStatus {
        PeerStatus { stake }
    }

    pub fn stake(&self) -> i64 {
        self.stake
    }

    pub fn with_stake(&self, stake: i64) -> PeerStatus {
        PeerStatus { stake }
    }
}

impl Encode for PeerStatus {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Record as u8);
        out.push(RecordTag::PeerStatus as u8);
        write_ivlq(self.stake, out);
    }
}

impl Decode for PeerStatus {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::PeerStatus)?;
        let (stake, n) = read_ivlq(&input[pos..])?;
        pos += n;
        Ok((PeerStatus { stake }, pos))
    }
}
