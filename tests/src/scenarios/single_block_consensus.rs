//! Single-block consensus, 9 peers, equal stake.
//! Peer 0 proposes one Transfer; after four full gossip rounds every peer
//! agrees, `consensusPoint == 1` everywhere, and funds are conserved.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_02_collections::Vector;
    use cc_04_state::{SignedData, Transaction, TransactionPayload, TRANSFER_JUICE};
    use node_runtime::{run_gossip_round, InProcessNetwork, Node, NodeConfig};
    use shared_bus::InMemoryEventBus;
    use shared_crypto::signatures::Ed25519KeyPair;
    use shared_types::Address;

    use crate::scenarios::fixtures::{genesis_with_accounts, keypairs};

    const PEER_COUNT: usize = 9;
    const STAKE_PER_PEER: i64 = 100;
    const ROUNDS: usize = 4;
    const MAILBOX_CAPACITY: usize = 64;

    #[tokio::test]
    async fn nine_peers_agree_on_one_transfer_after_four_rounds() {
        let (keypairs, keys) = keypairs(PEER_COUNT);
        let genesis = genesis_with_accounts(&keys, STAKE_PER_PEER, |i| ((i + 1) as i64) * 1_000_000);

        let bus = Arc::new(InMemoryEventBus::new());
        let mut nodes: Vec<Node> =
            keypairs.into_iter().map(|kp| Node::new(NodeConfig::new(kp, genesis.clone()), bus.clone())).collect();

        // The signature on a Transaction is never checked against its
        // origin address (the core never inspects payload ownership), so
        // any valid keypair may sign it.
        let signer = Ed25519KeyPair::generate();
        let transfer = Transaction::new(Address::new(0), 1, TransactionPayload::Transfer { target: Address::new(8), amount: 100 });
        let signed = SignedData::sign(&signer, transfer);
        nodes[0].propose_block(Vector::from_iter([signed])).await.unwrap();

        let mut network = InProcessNetwork::new(keys.iter().copied(), MAILBOX_CAPACITY);
        for _ in 0..ROUNDS {
            run_gossip_round(&mut nodes, &mut network).await.unwrap();
        }

        let total_before: i64 = (0..PEER_COUNT).map(|i| ((i + 1) as i64) * 1_000_000).sum::<i64>() + STAKE_PER_PEER * PEER_COUNT as i64;

        let first_belief = nodes[0].peer().belief().clone();
        for node in &nodes[1..] {
            assert!(node.peer().belief() == &first_belief);
        }

        for node in &nodes {
            let order = node.peer().own_order().unwrap();
            assert_eq!(order.consensus_point(), 1);
            let state = node.peer().consensus_state();
            assert_eq!(state.accounts().get(0).balance(), 1_000_000 - 100 - TRANSFER_JUICE);
            assert_eq!(state.accounts().get(8).balance(), 9_000_000 + 100);
            assert_eq!(state.compute_total_funds(), total_before);
        }
    }
}
