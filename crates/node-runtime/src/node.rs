//! `Node`: one participant's [`Peer`], cell store and event-bus handle,
//! wired together for the in-process gossip demo, and [`run_gossip_round`],
//! the function that drives one full round across several of them.

use std::sync::Arc;

use cc_02_collections::Vector;
use cc_03_store::memory::MemoryStore;
use cc_04_state::{Belief, DefaultExecutor, SignedData, Transaction};
use cc_05_consensus::{ConsensusError, Peer};
use cc_06_wire::Message;
use shared_bus::{ConsensusEvent, EventPublisher, InMemoryEventBus};
use shared_types::AccountKey;
use tracing::info;

use crate::config::NodeConfig;
use crate::network::InProcessNetwork;

/// One gossiping participant: its consensus [`Peer`], an in-memory cell
/// store (swap in [`cc_03_store::disk::DiskStore`] for a durable node —
/// this demo has no need of one), and the bus it publishes lifecycle
/// events to.
pub struct Node {
    peer: Peer<DefaultExecutor>,
    store: MemoryStore,
    bus: Arc<InMemoryEventBus>,
}

impl Node {
    pub fn new(config: NodeConfig, bus: Arc<InMemoryEventBus>) -> Node {
        let peer = Peer::new(config.keypair, config.genesis_state, DefaultExecutor);
        Node { peer, store: MemoryStore::new(), bus }
    }

    pub fn own_key(&self) -> AccountKey {
        self.peer.own_key()
    }

    pub fn peer(&self) -> &Peer<DefaultExecutor> {
        &self.peer
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Append `transactions` as a new block on this node's own order.
    pub async fn propose_block(&mut self, transactions: Vector<SignedData<Transaction>>) -> Result<(), ConsensusError> {
        let event = self.peer.propose_block(transactions)?;
        self.publish(event).await;
        Ok(())
    }

    /// Merge every `Belief` addressed to this node this round, publishing
    /// the resulting lifecycle events to the bus.
    pub async fn merge(&mut self, received: &[Belief]) -> Result<(), ConsensusError> {
        let events = self.peer.merge_beliefs(received)?;
        for event in events {
            self.publish(event).await;
        }
        Ok(())
    }

    async fn publish(&self, event: ConsensusEvent) {
        self.bus.publish(event).await;
    }
}

/// Drive one full gossip round: every node broadcasts its current belief
/// over `network`, then every node drains its mailbox and merges whatever
/// `Belief` messages arrived. Non-belief message kinds received this round
/// are ignored — node-runtime drives only the belief-merge path, not the
/// query/transact/status/challenge side of the wire protocol.
pub async fn run_gossip_round(nodes: &mut [Node], network: &mut InProcessNetwork) -> Result<(), ConsensusError> {
    for node in nodes.iter() {
        let belief = node.peer().belief().clone();
        let rejected = network.gossip(node.own_key(), &Message::Belief(belief));
        for (peer, err) in rejected {
            info!(%peer, %err, "gossip send rejected");
        }
    }

    for node in nodes.iter_mut() {
        let received: Vec<Belief> = network
            .receive(node.own_key())
            .into_iter()
            .filter_map(|m| match m {
                Message::Belief(b) => Some(b),
                _ => None,
            })
            .collect();
        node.merge(&received).await?;
    }

    Ok(())
}
