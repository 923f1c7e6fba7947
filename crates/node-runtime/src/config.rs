//! Construction-time node configuration. Configuration loading and CLI
//! argument parsing are out of scope here (spec's Non-goals): a
//! `NodeConfig` is built directly in code, by `main` or by the `tests`
//! crate's scenario harness, rather than parsed from argv or a file.

use cc_04_state::State;
use shared_crypto::signatures::Ed25519KeyPair;

/// Everything one [`crate::node::Node`] needs at construction: its
/// keypair and the genesis state it starts from. Every node taking part in
/// the same gossip round must be built from the same `genesis_state`, or
/// their stake-weighted votes will not agree on what "total stake" means.
pub struct NodeConfig {
    pub keypair: Ed25519KeyPair,
    pub genesis_state: State,
}

impl NodeConfig {
    pub fn new(keypair: Ed25519KeyPair, genesis_state: State) -> NodeConfig {
        NodeConfig { keypair, genesis_state }
    }
}
