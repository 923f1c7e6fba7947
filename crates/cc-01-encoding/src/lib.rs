//! # Canonical Encoding
//!
//! Every cell in the system has one canonical byte encoding: tag-prefixed,
//! self-delimiting, deterministic. Two structurally equal values always
//! produce equal bytes and therefore equal hashes — this is what makes
//! content addressing and fast belief comparison (via shared-subtree hash
//! equality) possible.
//!
//! This crate owns the closed tag set, the VLQ varint format, the
//! `Encode`/`Decode` capability every cell kind implements, and `Ref<T>`,
//! the embedded-or-indirect child reference. Persistent collections
//! (`cc-02-collections`) and typed records (`cc-04-state`) build on top of
//! these primitives rather than redefining them.

pub mod cell;
pub mod codec;
pub mod error;
pub mod identity;
pub mod refs;
pub mod tag;
pub mod varint;

pub use cell::Cell;
pub use codec::{Decode, Encode};
pub use error::CodecError;
pub use refs::{is_embedded, Ref, MAX_EMBEDDED};
pub use tag::{RecordTag, Tag};
