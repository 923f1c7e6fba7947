//! Runs a handful of in-process peers through several gossip rounds and
//! reports the resulting proposal/consensus points. This binary takes no
//! arguments: every peer's [`NodeConfig`] is built in code, as described
//! in `node_runtime::config`.

use std::sync::Arc;

use cc_04_state::{AccountStatus, PeerStatus, State};
use chain_telemetry::{init_telemetry, TelemetryConfig};
use node_runtime::{run_gossip_round, InProcessNetwork, Node, NodeConfig};
use shared_bus::InMemoryEventBus;
use shared_crypto::signatures::Ed25519KeyPair;
use shared_types::AccountKey;
use tracing::info;

const PEER_COUNT: usize = 3;
const GOSSIP_ROUNDS: usize = 4;
const STAKE_PER_PEER: i64 = 100;
const MAILBOX_CAPACITY: usize = 32;

fn genesis_with_peers(keys: &[AccountKey]) -> State {
    let mut state = State::genesis();
    for key in keys {
        state = state.with_peer(*key, PeerStatus::new(STAKE_PER_PEER));
    }
    let (state, _) = state.with_new_account(AccountStatus::new(1_000_000, 0));
    state
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _telemetry = init_telemetry(TelemetryConfig::default()).await?;

    let keypairs: Vec<Ed25519KeyPair> = (0..PEER_COUNT).map(|_| Ed25519KeyPair::generate()).collect();
    let keys: Vec<AccountKey> = keypairs.iter().map(|kp| AccountKey::from_bytes(*kp.public_key().as_bytes())).collect();
    let genesis = genesis_with_peers(&keys);

    let bus = Arc::new(InMemoryEventBus::new());
    let mut nodes: Vec<Node> = keypairs
        .into_iter()
        .map(|keypair| Node::new(NodeConfig::new(keypair, genesis.clone()), bus.clone()))
        .collect();

    nodes[0].propose_block(cc_02_collections::Vector::new()).await?;

    let mut network = InProcessNetwork::new(keys.iter().copied(), MAILBOX_CAPACITY);
    for round in 0..GOSSIP_ROUNDS {
        run_gossip_round(&mut nodes, &mut network).await?;
        info!(round, "gossip round complete");
    }

    for (key, node) in keys.iter().zip(nodes.iter()) {
        let order = node.peer().own_order().expect("peer always holds its own order");
        info!(%key, proposal_point = order.proposal_point(), consensus_point = order.consensus_point(), "final cut points");
    }

    Ok(())
}
