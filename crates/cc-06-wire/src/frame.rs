//! `length: VLQ, tag: 1, body: bytes` framing over an ordered, reliable byte
//! stream. Pure encode/decode: nothing here touches a socket.

use cc_01_encoding::varint::{read_uvlq, write_uvlq};

use crate::error::WireError;

/// Append one frame — `length` covers `tag` plus `body` — to `out`.
pub fn write_frame(tag: u8, body: &[u8], out: &mut Vec<u8>) {
    let len = 1 + body.len();
    write_uvlq(len as u64, out);
    out.push(tag);
    out.extend_from_slice(body);
}

/// Parse one frame from the front of `input`, returning `(tag, body,
/// bytes_consumed)`. `Truncated` means the caller should buffer more bytes
/// and retry rather than treat the stream as malformed.
pub fn read_frame(input: &[u8]) -> Result<(u8, &[u8], usize), WireError> {
    let (len, n) = match read_uvlq(input) {
        Ok(v) => v,
        Err(_) => return Err(WireError::Truncated("incomplete length prefix".into())),
    };
    let len = len as usize;
    if len == 0 {
        return Err(WireError::Truncated("zero-length frame has no tag".into()));
    }
    let body_len = len - 1;
    let frame_end = n.checked_add(len).ok_or_else(|| WireError::Truncated("frame length overflow".into()))?;
    let frame = input
        .get(n..frame_end)
        .ok_or_else(|| WireError::Truncated("frame body not yet fully received".into()))?;
    let tag = frame[0];
    let body = &frame[1..1 + body_len];
    Ok((tag, body, frame_end))
}

/// Where encoded frames go once built. Modeled after a bounded channel's
/// `try_send`, so a transport with a full outbound queue reports
/// back-pressure rather than this crate assuming an unbounded buffer (spec
/// §5's scheduling model, §6).
pub trait FrameSink {
    fn try_send_frame(&mut self, frame: Vec<u8>) -> Result<(), SendError>;
}

/// Why a [`FrameSink`] rejected a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("outbound queue full")]
    Full,
    #[error("sink closed")]
    Closed,
}
