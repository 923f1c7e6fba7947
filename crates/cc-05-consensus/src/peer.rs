//! `Peer`: local authority over one participant's keypair, Belief,
//! consensus State and state history.
//!
//! A `Peer` is single-owner and message-driven: every mutating
//! method takes `&mut self` and returns the lifecycle events the caller
//! should publish to [`shared_bus`], rather than handing back a whole new
//! `Peer` — an `Ed25519KeyPair` is deliberately not `Clone` (its
//! contract is sign/verify over bytes, not key duplication), so a
//! "return an updated Peer" shape would force an awkward keypair rebuild on
//! every call. `merge_beliefs` itself stays a pure function of its
//! inputs internally (see [`crate::merge`]); only the assignment back into
//! `self` at the end is a mutation.

use std::collections::HashMap as StdHashMap;

use cc_01_encoding::codec::Encode;
use cc_02_collections::{BlobMap, HashMap};
use cc_04_state::{Belief, Executor, Order, SignedData, State, Transaction};
use chain_telemetry::{HistogramTimer, CONSENSUS_POINT, MERGE_DURATION, MERGE_ENTRIES_DROPPED, MERGE_ROUNDS, PROPOSAL_POINT};
use shared_bus::ConsensusEvent;
use shared_crypto::signatures::Ed25519KeyPair;
use shared_types::AccountKey;
use tracing::{debug, info, instrument, warn};

use crate::error::ConsensusError;
use crate::merge;

fn drop_reason_label(reason: shared_bus::DropReason) -> &'static str {
    match reason {
        shared_bus::DropReason::BadSignature => "bad_signature",
        shared_bus::DropReason::KeyMismatch => "key_mismatch",
        shared_bus::DropReason::StaleTimestamp => "stale_timestamp",
        shared_bus::DropReason::StaleConsensusPoint => "stale_consensus_point",
    }
}

/// Local authority for one consensus participant.
pub struct Peer<E: Executor> {
    keypair: Ed25519KeyPair,
    own_key: AccountKey,
    belief: Belief,
    consensus_state: State,
    state_history: BlobMap<i64, State>,
    clock: i64,
    executor: E,
}

impl<E: Executor> Peer<E> {
    /// Build a peer at genesis: an empty Order signed under `keypair`, and
    /// `genesis_state` as both the consensus state and the sole entry (at
    /// index 0) of `stateHistory`.
    pub fn new(keypair: Ed25519KeyPair, genesis_state: State, executor: E) -> Peer<E> {
        let own_key = AccountKey::from_bytes(*keypair.public_key().as_bytes());
        let genesis_order = Order::genesis(0);
        let signed = SignedData::sign(&keypair, genesis_order);
        let belief = Belief::new(HashMap::new().assoc(own_key, signed), 0);
        let state_history = BlobMap::new().assoc(0, genesis_state.clone());
        Peer { keypair, own_key, belief, consensus_state: genesis_state, state_history, clock: 0, executor }
    }

    pub fn own_key(&self) -> AccountKey {
        self.own_key
    }

    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    pub fn consensus_state(&self) -> &State {
        &self.consensus_state
    }

    pub fn state_history(&self) -> &BlobMap<i64, State> {
        &self.state_history
    }

    pub fn clock(&self) -> i64 {
        self.clock
    }

    /// This peer's own `Order`, or `None` before `new` has ever run (should
    /// not happen: `new` always seeds one).
    pub fn own_order(&self) -> Option<Order> {
        self.order_of(&self.own_key)
    }

    /// The latest `Order` this peer has observed from `peer_key`, if any.
    pub fn order_of(&self, peer_key: &AccountKey) -> Option<Order> {
        self.belief.orders().get(peer_key).and_then(SignedData::value).cloned()
    }

    /// Advance the peer's wall clock. Monotone: a `t` not ahead of the
    /// current clock is ignored rather than erroring.
    pub fn update_timestamp(&mut self, t: i64) {
        if t > self.clock {
            self.clock = t;
        }
    }

    /// Append `transactions` as a new block to this peer's own Order,
    /// re-signed under its key.
    #[instrument(skip(self, transactions))]
    pub fn propose_block(
        &mut self,
        transactions: cc_02_collections::Vector<SignedData<Transaction>>,
    ) -> Result<ConsensusEvent, ConsensusError> {
        let old_order = self.own_order().expect("peer always holds its own Order");
        let block = cc_04_state::Block::new(self.clock, self.own_key, transactions);
        let block_hash = block.hash();
        let new_blocks = old_order.blocks().append(block);
        let index = new_blocks.count() as u64 - 1;
        let new_order = Order::new(new_blocks, old_order.proposal_point(), old_order.consensus_point(), self.clock)
            .map_err(|e| ConsensusError::InvalidOrder(e.to_string()))?;
        let signed = SignedData::sign(&self.keypair, new_order);
        let orders = self.belief.orders().assoc(self.own_key, signed);
        self.belief = Belief::new(orders, self.clock);
        info!(index, "proposed block");
        Ok(ConsensusEvent::BlockProposed { block_hash, index })
    }

    /// Run the belief-merge algorithm against `received`,
    /// mutating `self` in place and returning the lifecycle events the
    /// caller should publish.
    #[instrument(skip(self, received))]
    pub fn merge_beliefs(&mut self, received: &[Belief]) -> Result<Vec<ConsensusEvent>, ConsensusError> {
        let _timer = HistogramTimer::new(&MERGE_DURATION);
        MERGE_ROUNDS.inc();
        let mut events = Vec::new();

        let previous_consensus_points: StdHashMap<AccountKey, i64> = self
            .belief
            .orders()
            .entries()
            .into_iter()
            .filter_map(|(k, v)| v.value().map(|o| (k, o.consensus_point())))
            .collect();

        let received_order_maps: Vec<&HashMap<AccountKey, SignedData<Order>>> =
            received.iter().map(Belief::orders).collect();
        let (combined, dropped) =
            merge::combine_orders(self.belief.orders(), received_order_maps, &previous_consensus_points, &self.own_key);

        for entry in &dropped {
            debug!(peer = %entry.peer, reason = ?entry.reason, "dropped order entry during merge");
            MERGE_ENTRIES_DROPPED.with_label_values(&[drop_reason_label(entry.reason)]).inc();
            events.push(ConsensusEvent::OrderEntryDropped { peer: entry.peer, reason: entry.reason });
        }

        let orders_vec: Vec<(AccountKey, Order)> = combined
            .entries()
            .into_iter()
            .filter_map(|(k, v)| v.value().map(|o| (k, o.clone())))
            .collect();

        let old_self_order = combined
            .get(&self.own_key)
            .and_then(SignedData::value)
            .cloned()
            .unwrap_or_else(|| self.own_order().expect("peer always holds its own Order"));

        let total_stake = self.consensus_state.total_stake();
        let stake_of = |k: &AccountKey| self.consensus_state.stake_of(k);
        let known_stake: i64 = orders_vec.iter().map(|(k, _)| stake_of(k)).sum();

        let winner = merge::select_winning_chain(&orders_vec, stake_of, total_stake)
            .unwrap_or_else(|| old_self_order.blocks().clone());
        let new_self_blocks = merge::update_own_blocks(&old_self_order, &winner);

        let (proposal_point, consensus_point) = if total_stake > 0 && known_stake * 2 > total_stake {
            let proposal_point = merge::advance_proposal_point(
                &new_self_blocks,
                &orders_vec,
                stake_of,
                total_stake,
                old_self_order.proposal_point(),
            );
            let consensus_point = merge::advance_consensus_point(
                &new_self_blocks,
                proposal_point,
                &orders_vec,
                stake_of,
                total_stake,
                old_self_order.consensus_point(),
            );
            (proposal_point, consensus_point)
        } else {
            warn!(known_stake, total_stake, "participation failure, cut points held");
            (old_self_order.proposal_point(), old_self_order.consensus_point())
        };

        if proposal_point > old_self_order.proposal_point() {
            events.push(ConsensusEvent::ProposalAdvanced { from: old_self_order.proposal_point() as u64, to: proposal_point as u64 });
        }
        if consensus_point > old_self_order.consensus_point() {
            events.push(ConsensusEvent::ConsensusAdvanced { from: old_self_order.consensus_point() as u64, to: consensus_point as u64 });
        }

        let new_timestamp = self.clock.max(old_self_order.timestamp());
        let new_self_order = Order::new(new_self_blocks, proposal_point, consensus_point, new_timestamp)
            .map_err(|e| ConsensusError::InvalidOrder(e.to_string()))?;
        let own_order_hash = shared_types::Hash::from_bytes(shared_crypto::hashing::blake3_hash(&new_self_order.to_bytes()));
        let signed_self = SignedData::sign(&self.keypair, new_self_order.clone());
        let final_orders = combined.assoc(self.own_key, signed_self);
        self.belief = Belief::new(final_orders, new_timestamp);

        self.catch_up(old_self_order.consensus_point(), consensus_point, new_self_order.blocks())?;

        PROPOSAL_POINT.set(proposal_point as f64);
        CONSENSUS_POINT.set(consensus_point as f64);

        events.push(ConsensusEvent::BeliefMerged {
            own_order_hash,
            proposal_point: proposal_point as u64,
            consensus_point: consensus_point as u64,
        });
        info!(proposal_point, consensus_point, "belief merge complete");
        Ok(events)
    }

    /// Apply blocks `[prev, new)` to `consensus_state` in order, recording
    /// each intermediate state into `stateHistory`.
    fn catch_up(&mut self, prev: i64, new: i64, blocks: &cc_02_collections::Vector<cc_04_state::Block>) -> Result<(), ConsensusError> {
        let mut state = self.consensus_state.clone();
        for index in prev..new {
            let block = blocks.get(index as usize);
            for tx in block.transactions().iter() {
                state = self.executor.apply(&state, tx, &block.peer_key())?;
            }
            self.state_history = self.state_history.assoc(index + 1, state.clone());
        }
        if new > prev {
            self.consensus_state = state;
        }
        Ok(())
    }
}
