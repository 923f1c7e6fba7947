//! Partial gossip: peers exchange beliefs only with a bounded subset of
//! the network each round (fanout, not full broadcast) rather than
//! `node_runtime::run_gossip_round`'s all-to-all spread. Information still
//! reaches every peer eventually because a peer's gossiped belief already
//! carries everything it has heard transitively, so fixed-fanout rounds
//! relay rather than silo. Scaled down from a nine-peers/ten-blocks-each
//! configuration to keep the round count this test needs tractable; see
//! DESIGN.md.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_02_collections::Vector;
    use cc_04_state::{Belief, SignedData, Transaction, TransactionPayload};
    use cc_06_wire::Message;
    use node_runtime::{InProcessNetwork, Node, NodeConfig};
    use shared_bus::InMemoryEventBus;
    use shared_crypto::signatures::Ed25519KeyPair;
    use shared_types::{AccountKey, Address};

    use crate::scenarios::fixtures::{genesis_with_accounts, keypairs};

    const PEER_COUNT: usize = 6;
    const FANOUT: usize = 2;
    const BLOCKS_PER_PEER: usize = 2;
    const STAKE_PER_PEER: i64 = 100;
    const ROUNDS: usize = 80;
    const MAILBOX_CAPACITY: usize = 512;

    /// Every peer gossips only to the `FANOUT` peers that follow it in the
    /// ring, then every peer merges whatever arrived.
    async fn run_fanout_round(nodes: &mut [Node], keys: &[AccountKey], network: &mut InProcessNetwork) {
        for (i, node) in nodes.iter().enumerate() {
            let targets: Vec<AccountKey> = (1..=FANOUT).map(|step| keys[(i + step) % keys.len()]).collect();
            let belief = node.peer().belief().clone();
            network.gossip_to(node.own_key(), &targets, &Message::Belief(belief));
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
            node.merge(&received).await.unwrap();
        }
    }

    #[tokio::test]
    async fn bounded_fanout_gossip_still_reaches_full_consensus() {
        let (keypairs, keys) = keypairs(PEER_COUNT);
        let genesis = genesis_with_accounts(&keys, STAKE_PER_PEER, |i| ((i + 1) as i64) * 1_000_000);

        let bus = Arc::new(InMemoryEventBus::new());
        let mut nodes: Vec<Node> =
            keypairs.into_iter().map(|kp| Node::new(NodeConfig::new(kp, genesis.clone()), bus.clone())).collect();

        for i in 0..PEER_COUNT {
            for b in 0..BLOCKS_PER_PEER {
                let signer = Ed25519KeyPair::generate();
                let target = Address::new(((i + 1) % PEER_COUNT) as u64);
                let transfer =
                    Transaction::new(Address::new(i as u64), (b + 1) as i64, TransactionPayload::Transfer { target, amount: 1 });
                let signed = SignedData::sign(&signer, transfer);
                nodes[i].propose_block(Vector::from_iter([signed])).await.unwrap();
            }
        }

        let mut network = InProcessNetwork::new(keys.iter().copied(), MAILBOX_CAPACITY);
        for _ in 0..ROUNDS {
            run_fanout_round(&mut nodes, &keys, &mut network).await;
        }

        let expected_blocks = (PEER_COUNT * BLOCKS_PER_PEER) as i64;
        let first_belief = nodes[0].peer().belief().clone();
        for node in &nodes[1..] {
            assert!(node.peer().belief() == &first_belief);
        }
        for node in &nodes {
            let order = node.peer().own_order().unwrap();
            assert_eq!(order.consensus_point(), expected_blocks);
        }
    }
}
