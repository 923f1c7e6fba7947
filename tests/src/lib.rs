//! Workspace-level test crate: collection-law property tests plus the
//! literal end-to-end scenarios, run against real
//! `cc-05-consensus` peers over `node_runtime`'s in-process gossip stub.

pub mod collection_laws;
pub mod scenarios;
