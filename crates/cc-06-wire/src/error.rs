//! Errors surfaced while framing or parsing gossip messages.

use cc_01_encoding::error::CodecError;
use thiserror::Error;

/// Failures decoding a frame or the message body inside it.
///
/// Under the propagation policy, a `BadFormat` from a peer is meant to
/// close that peer's connection; this crate only parses bytes; the caller
/// (the transport layer) decides what a `WireError` means for the
/// connection.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("frame truncated: {0}")]
    Truncated(String),

    #[error("unknown message tag {0}")]
    BadTag(u8),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
