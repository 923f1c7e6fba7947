//! Multi-block consensus: all nine peers propose a distinct, non-conflicting
//! transfer before any gossip happens. The first round's merge has no
//! deeper agreement to fall back on, so every peer's vote lands on the
//! shared empty prefix, and `select_winning_chain` linearizes all nine
//! simultaneously-proposed blocks into one chain by ascending block hash
//! (see `cc_05_consensus::merge::linearize_sibling_tips`) rather than
//! picking a single winner and leaving the rest for later rounds. From
//! there proposalPoint and consensusPoint climb the same way a
//! single-proposer round does.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_02_collections::Vector;
    use cc_04_state::{SignedData, Transaction, TransactionPayload};
    use node_runtime::{run_gossip_round, InProcessNetwork, Node, NodeConfig};
    use shared_bus::InMemoryEventBus;
    use shared_crypto::signatures::Ed25519KeyPair;
    use shared_types::Address;

    use crate::scenarios::fixtures::{genesis_with_accounts, keypairs};

    const PEER_COUNT: usize = 9;
    const STAKE_PER_PEER: i64 = 100;
    const ROUNDS: usize = 4;
    const MAILBOX_CAPACITY: usize = 256;

    #[tokio::test]
    async fn nine_independent_proposals_all_reach_consensus() {
        let (keypairs, keys) = keypairs(PEER_COUNT);
        let genesis = genesis_with_accounts(&keys, STAKE_PER_PEER, |i| ((i + 1) as i64) * 1_000_000);

        let bus = Arc::new(InMemoryEventBus::new());
        let mut nodes: Vec<Node> =
            keypairs.into_iter().map(|kp| Node::new(NodeConfig::new(kp, genesis.clone()), bus.clone())).collect();

        for i in 0..PEER_COUNT {
            let signer = Ed25519KeyPair::generate();
            let target = Address::new((PEER_COUNT - 1 - i) as u64);
            let transfer = Transaction::new(Address::new(i as u64), 1, TransactionPayload::Transfer { target, amount: 1 });
            let signed = SignedData::sign(&signer, transfer);
            nodes[i].propose_block(Vector::from_iter([signed])).await.unwrap();
        }

        let mut network = InProcessNetwork::new(keys.iter().copied(), MAILBOX_CAPACITY);
        for _ in 0..ROUNDS {
            run_gossip_round(&mut nodes, &mut network).await.unwrap();
        }

        let first_belief = nodes[0].peer().belief().clone();
        for node in &nodes[1..] {
            assert!(node.peer().belief() == &first_belief);
        }

        for node in &nodes {
            let order = node.peer().own_order().unwrap();
            assert_eq!(order.consensus_point(), PEER_COUNT as i64);
            let state = node.peer().consensus_state();
            for i in 0..PEER_COUNT {
                assert_eq!(state.accounts().get(i).sequence(), 1);
            }
        }
    }
}
