//! `Transaction`, its payload kinds, and the `Executor` port blocks are
//! applied through.

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::tag::{RecordTag, Tag};
use cc_01_encoding::varint::{read_ivlq, write_ivlq};
use shared_types::{AccountKey, Address};
use tracing::warn;

use crate::account::AccountStatus;
use crate::block::expect_record;
use crate::error::StateError;
use crate::signed::SignedData;
use crate::state::State;

/// Flat fee deducted from the origin account for every applied transaction,
/// regardless of whether its payload succeeds, and credited to the
/// proposing peer's stake. This preserves the conservation property:
/// fees move within `State`, they are never destroyed.
pub const TRANSFER_JUICE: i64 = 50;

/// What a transaction does, beyond the common origin/sequence envelope.
/// Minimal by design (spec's Non-goals exclude a general contract VM); more
/// kinds would add variants here rather than widen an open type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Move `amount` from the transaction's origin account to `target`.
    Transfer { target: Address, amount: i64 },
}

/// A request to move the chain state forward by one step, signed by the
/// account it originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    origin: Address,
    sequence: i64,
    payload: TransactionPayload,
}

impl Transaction {
    pub fn new(origin: Address, sequence: i64, payload: TransactionPayload) -> Transaction {
        Transaction { origin, sequence, payload }
    }

    pub fn origin(&self) -> Address {
        self.origin
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }
}

const PAYLOAD_KIND_TRANSFER: u8 = 0;

impl Encode for Transaction {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Record as u8);
        out.push(RecordTag::Transaction as u8);
        self.origin.encode(out);
        write_ivlq(self.sequence, out);
        match &self.payload {
            TransactionPayload::Transfer { target, amount } => {
                out.push(PAYLOAD_KIND_TRANSFER);
                target.encode(out);
                write_ivlq(*amount, out);
            }
        }
    }
}

impl Decode for Transaction {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::Transaction)?;
        let (origin, n) = Address::decode(&input[pos..])?;
        pos += n;
        let (sequence, n) = read_ivlq(&input[pos..])?;
        pos += n;
        let kind = *input.get(pos).ok_or_else(|| CodecError::BadFormat("truncated transaction payload kind".into()))?;
        pos += 1;
        let payload = match kind {
            PAYLOAD_KIND_TRANSFER => {
                let (target, n) = Address::decode(&input[pos..])?;
                pos += n;
                let (amount, n) = read_ivlq(&input[pos..])?;
                pos += n;
                TransactionPayload::Transfer { target, amount }
            }
            other => return Err(CodecError::BadFormat(format!("unknown transaction payload kind {other}"))),
        };
        Ok((Transaction { origin, sequence, payload }, pos))
    }
}

/// Applies a signed transaction against a `State`, producing the successor
/// state. Implementations decide what a rejected transaction costs the
/// origin beyond the flat juice fee; the core consensus engine never
/// inspects payload semantics itself.
pub trait Executor {
    fn apply(&self, state: &State, signed_tx: &SignedData<Transaction>, producer: &AccountKey) -> Result<State, StateError>;
}

/// The `Transfer`-only executor. A transaction that fails validation
/// (stale sequence, insufficient balance, unknown target) still costs its
/// origin the juice fee and otherwise leaves state untouched: the chain
/// advances past it rather than treating it as a core failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExecutor;

impl Executor for DefaultExecutor {
    fn apply(&self, state: &State, signed_tx: &SignedData<Transaction>, producer: &AccountKey) -> Result<State, StateError> {
        signed_tx.verify()?;
        let tx = signed_tx
            .value()
            .ok_or_else(|| StateError::InvalidData("transaction payload ref is indirect in bare apply".into()))?;

        let origin_index = tx.origin().index() as usize;
        if origin_index >= state.accounts().count() {
            return Err(StateError::InvalidData(format!("transaction origin address {origin_index} unknown")));
        }
        let origin_account = *state.accounts().get(origin_index);

        if origin_account.balance() < TRANSFER_JUICE {
            warn!(origin = origin_index, "account cannot afford transaction juice, transaction dropped");
            return Ok(state.clone());
        }

        let charged = origin_account.with_balance(origin_account.balance() - TRANSFER_JUICE);
        let mut next = state.with_account(origin_index, charged).with_peer_stake_delta(producer, TRANSFER_JUICE);

        if tx.sequence() != origin_account.sequence() + 1 {
            warn!(
                origin = origin_index,
                expected = origin_account.sequence() + 1,
                got = tx.sequence(),
                "stale or out-of-order transaction sequence, payload skipped"
            );
            return Ok(next);
        }

        match tx.payload() {
            TransactionPayload::Transfer { target, amount } => {
                let target_index = target.index() as usize;
                if target_index >= next.accounts().count() {
                    warn!(target = target_index, "transfer target account unknown, payload skipped");
                    return Ok(next);
                }
                if charged.balance() < *amount {
                    warn!(origin = origin_index, "insufficient balance for transfer, payload skipped");
                    return Ok(next);
                }
                let from = charged.with_balance(charged.balance() - amount).with_next_sequence();
                let to = *next.accounts().get(target_index);
                let to = to.with_balance(to.balance() + amount);
                next = next.with_account(origin_index, from);
                next = next.with_account(target_index, to);
                Ok(next)
            }
        }
    }
}
