//! Errors surfaced while merging beliefs or proposing blocks.

use shared_types::Hash;
use thiserror::Error;

/// Failures the belief-merge engine can report. Most edge cases in spec
/// §4.5 (bad signature, stale timestamp, stale consensusPoint) are *not*
/// errors: they are silently dropped entries, recorded as
/// [`shared_bus::ConsensusEvent::OrderEntryDropped`] rather than surfaced
/// here. This enum covers failures that abort the round.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// The peer's own order, after a merge, violates the point invariant.
    /// Indicates a bug in the merge algorithm, not a malicious peer.
    #[error("invalid order after merge: {0}")]
    InvalidOrder(String),

    /// State catch-up needed a cell that was not in the local store.
    #[error("missing data during state catch-up: {0}")]
    MissingData(Hash),

    /// The transaction executor rejected a consensed block outright, rather
    /// than leaving state untouched (a misbehaving `Executor` impl:
    /// transaction failure is meant to be a no-op, not a hard error).
    #[error("transaction application failed: {0}")]
    TransactionException(String),
}

impl From<cc_04_state::StateError> for ConsensusError {
    fn from(e: cc_04_state::StateError) -> Self {
        match e {
            cc_04_state::StateError::TransactionException(msg) => ConsensusError::TransactionException(msg),
            other => ConsensusError::InvalidOrder(other.to_string()),
        }
    }
}

impl From<cc_03_store::StoreError> for ConsensusError {
    fn from(e: cc_03_store::StoreError) -> Self {
        match e {
            cc_03_store::StoreError::MissingData(h) => ConsensusError::MissingData(h),
            other => ConsensusError::InvalidOrder(other.to_string()),
        }
    }
}
