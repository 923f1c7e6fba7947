//! Errors surfaced by the encoding layer.

use thiserror::Error;

/// Failures decoding or validating a canonical cell encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The bytes are not a valid canonical encoding: a field is missing, a
    /// count disagrees with a mask's popcount, or a tag byte is unknown.
    #[error("bad format: {0}")]
    BadFormat(String),

    /// The bytes decoded but violate a structural invariant of the cell
    /// kind (e.g. a trie leaf over capacity). Distinct from `BadFormat`
    /// because the bytes themselves parsed; only believing them would be
    /// wrong.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
