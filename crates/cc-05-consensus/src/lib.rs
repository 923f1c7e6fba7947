//! # Belief-Merge Consensus Engine
//!
//! [`merge`] holds the pure functions that implement the belief-merge
//! algorithm (combine, select winning chain, advance proposal/consensus
//! points); [`peer::Peer`] sequences them against one participant's
//! keypair, Belief and consensus State.

pub mod error;
pub mod merge;
pub mod peer;

pub use error::ConsensusError;
pub use merge::DroppedEntry;
pub use peer::Peer;
