//! # Shared Types Crate
//!
//! Identity and digest primitives shared across every crate in the
//! workspace: `Hash` (content-addressing digest), `AccountKey` (Ed25519
//! public key used as both peer and account identity) and `Signature`.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate primitives live here so
//!   `cc-01-encoding`, `cc-04-state` and `cc-05-consensus` agree on one
//!   `Hash`/`AccountKey` type rather than each defining their own alias.

pub mod address;
pub mod hash;
pub mod keys;

pub use address::Address;
pub use hash::Hash;
pub use keys::{AccountKey, Signature};
