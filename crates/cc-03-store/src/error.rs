//! Errors surfaced by the cell store.

use shared_types::Hash;
use thiserror::Error;

/// Failures reading, writing or recovering the cell store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A needed cell is not present locally. Recoverable: the caller
    /// accumulates the hash and requests it from the network.
    #[error("missing data: {0}")]
    MissingData(Hash),

    /// Bytes under a hash disagree with that hash, or an append-only record
    /// is structurally malformed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Disk I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
