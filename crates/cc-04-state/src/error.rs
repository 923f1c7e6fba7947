//! Errors surfaced by record validation and transaction application (spec
//! §7).

use thiserror::Error;

/// Failures validating a signed record or applying a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A `SignedData` failed Ed25519 verification.
    #[error("bad signature")]
    BadSignature,

    /// A cell decoded but violates a structural invariant (e.g. `Order`'s
    /// `consensusPoint <= proposalPoint <= blocks.count`).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The executor rejected a transaction. Surfaced in the `Result`
    /// message, not a core failure: the chain still advances past
    /// a rejected transaction, it simply has no effect beyond juice
    /// deduction.
    #[error("transaction rejected: {0}")]
    TransactionException(String),
}
