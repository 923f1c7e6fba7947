//! # Node Runtime
//!
//! A binary that owns a [`Peer`](cc_05_consensus::Peer), a
//! [`CellStore`](cc_03_store::CellStore) and drives one or more gossip
//! rounds end to end against an in-process transport stub. There is no
//! real networking, peer discovery or CLI here — this crate is for
//! demonstration and for the `tests` crate's scenario harness, both of
//! which construct a [`NodeConfig`] directly in code rather than parsing
//! one from argv.

pub mod config;
pub mod network;
pub mod node;

pub use config::NodeConfig;
pub use network::InProcessNetwork;
pub use node::{run_gossip_round, Node};
