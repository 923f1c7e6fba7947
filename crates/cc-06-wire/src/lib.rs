//! # Wire Frame Codec
//!
//! `length:VLQ, tag:1, body:bytes` framing over the ten gossip message
//! kinds. Pure encode/decode; transport, back-pressure beyond
//! [`frame::FrameSink`], and handshake semantics belong to the layer above.

pub mod error;
pub mod frame;
pub mod message;

pub use error::WireError;
pub use frame::{read_frame, write_frame, FrameSink, SendError};
pub use message::{read_message, write_message, Message, MessageTag};
