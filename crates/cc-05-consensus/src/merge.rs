//! Pure functions implementing the belief-merge algorithm.
//!
//! Every function here takes its inputs by reference and returns a new
//! value; nothing here touches a store, a clock, or a keypair. [`crate::peer::Peer`]
//! is the only thing that sequences these steps against real state.

use std::collections::HashMap as StdHashMap;
use std::collections::HashSet as StdHashSet;

use cc_02_collections::HashMap;
use cc_04_state::{Block, Order, SignedData};
use cc_02_collections::Vector;
use shared_types::AccountKey;
use shared_bus::DropReason;

/// One entry dropped out of a combined `Orders` map, and why, surfaced so
/// the caller can publish [`shared_bus::ConsensusEvent::OrderEntryDropped`]
/// events without this module depending on the bus's async publish path.
pub struct DroppedEntry {
    pub peer: AccountKey,
    pub reason: DropReason,
}

/// Combine the peer's own belief's orders with every received belief's
/// orders, keeping per peer key the
/// signed Order with the largest timestamp that verifies and is not stale.
///
/// `previous_consensus_points` is this peer's last-observed `consensusPoint`
/// per signer, used for the "discard if consensusPoint regressed" edge
/// case; it is read, never written, by this function.
///
/// `own_key` is never overwritten from `received`: a peer is always the
/// sole authority over its own entry (it is about to re-sign it in step 5
/// regardless of anything gossip says), so a stale copy of our own Order
/// echoed back by another peer must not shadow the fresher one already in
/// `own` just because two rounds share a timestamp.
pub fn combine_orders<'a, I>(
    own: &HashMap<AccountKey, SignedData<Order>>,
    received: I,
    previous_consensus_points: &StdHashMap<AccountKey, i64>,
    own_key: &AccountKey,
) -> (HashMap<AccountKey, SignedData<Order>>, Vec<DroppedEntry>)
where
    I: IntoIterator<Item = &'a HashMap<AccountKey, SignedData<Order>>>,
{
    let mut combined = own.clone();
    // Track the best timestamp accepted so far per key, independent of
    // `combined`'s current contents, so within a single combine call a
    // later-arriving belief can still beat an earlier one even though both
    // are newer than what `own` started with.
    let mut best_timestamp: StdHashMap<AccountKey, i64> = StdHashMap::new();
    for (key, signed) in own.entries() {
        if let Some(order) = signed.value() {
            best_timestamp.insert(key, order.timestamp());
        }
    }
    let mut dropped = Vec::new();

    for belief_orders in received {
        for (peer, signed_order) in belief_orders.entries() {
            if peer == *own_key {
                continue;
            }
            if signed_order.verify().is_err() {
                dropped.push(DroppedEntry { peer, reason: DropReason::BadSignature });
                continue;
            }
            if signed_order.public_key() != peer {
                dropped.push(DroppedEntry { peer, reason: DropReason::KeyMismatch });
                continue;
            }
            let order = match signed_order.value() {
                Some(o) => o,
                None => continue, // indirect payload: nothing to compare, skip silently
            };

            if let Some(&prev_cp) = previous_consensus_points.get(&peer) {
                if order.consensus_point() < prev_cp {
                    dropped.push(DroppedEntry { peer, reason: DropReason::StaleConsensusPoint });
                    continue;
                }
            }

            let beats_current = match best_timestamp.get(&peer) {
                None => true,
                Some(&ts) => order.timestamp() >= ts,
            };
            if !beats_current {
                dropped.push(DroppedEntry { peer, reason: DropReason::StaleTimestamp });
                continue;
            }

            best_timestamp.insert(peer, order.timestamp());
            combined = combined.assoc(peer, signed_order);
        }
    }

    (combined, dropped)
}

/// Stake-weighted winning-chain selection.
///
/// A literal "does some whole chain already have majority support" test
/// deadlocks at genesis: the peer that just proposed a block is the only
/// voter whose own chain matches it, so no fresh block could ever clear
/// `TotalStake/2` on the very first round. Instead this searches prefix
/// lengths `L` from the longest proposed chain down to zero. At each `L` it
/// buckets the distinct `L`-long prefixes among chains of at least that
/// length, and for each bucket sums the stake of every voter (not just
/// bucket members) whose own chain shares at least an `L`-long common
/// prefix with it. The first `L` with a bucket clearing `> TotalStake/2`
/// wins, ties among buckets broken by longer extending chain, then higher
/// support, then lexicographically smaller final-block hash. At `L = 0`
/// every voter trivially shares the empty prefix with everything, so
/// support there is always `TotalStake`: the search always terminates,
/// degenerating at worst to the empty prefix when no deeper agreement
/// exists yet. The winning bucket's prefix then goes through
/// [`linearize_sibling_tips`], which folds in every distinct block any
/// majority-clearing voter proposes right past that prefix rather than
/// keeping only the single longest chain and dropping the rest for a later
/// round — this is what lets several peers' simultaneous, non-conflicting
/// proposals converge in one merge instead of one per round.
pub fn select_winning_chain(
    orders: &[(AccountKey, Order)],
    stake_of: impl Fn(&AccountKey) -> i64,
    total_stake: i64,
) -> Option<Vector<Block>> {
    let max_len = orders.iter().map(|(_, o)| o.blocks().count()).max().unwrap_or(0);

    for l in (0..=max_len).rev() {
        let mut buckets: Vec<(Vector<Block>, Vector<Block>)> = Vec::new(); // (prefix, longest chain extending it)
        for (_, order) in orders {
            if order.blocks().count() < l {
                continue;
            }
            let prefix = order.blocks().slice(0, l);
            match buckets.iter_mut().find(|(p, _)| *p == prefix) {
                Some((_, longest)) => {
                    if order.blocks().count() > longest.count() {
                        *longest = order.blocks().clone();
                    }
                }
                None => buckets.push((prefix, order.blocks().clone())),
            }
        }

        let mut best: Option<(i64, Vector<Block>, Vector<Block>)> = None; // (support, prefix, longest chain extending it)
        for (prefix, longest) in buckets {
            let support: i64 = orders
                .iter()
                .map(|(voter_key, voter_order)| {
                    if voter_order.blocks().common_prefix_length(&prefix) >= l { stake_of(voter_key) } else { 0 }
                })
                .sum();
            if support * 2 <= total_stake {
                continue;
            }
            let replace = match &best {
                None => true,
                Some((best_support, _, best_chain)) => {
                    if longest.count() != best_chain.count() {
                        longest.count() > best_chain.count()
                    } else if support != *best_support {
                        support > *best_support
                    } else {
                        final_block_hash(&longest) < final_block_hash(best_chain)
                    }
                }
            };
            if replace {
                best = Some((support, prefix, longest));
            }
        }

        if let Some((_, prefix, _)) = best {
            // `prefix` is the longest chain-start every majority-clearing
            // voter agrees on; anything any of them proposes right past it
            // is a simultaneous, non-conflicting continuation rather than a
            // rival chain, so fold all of those in now instead of settling
            // for just one and making the rest wait for a future round.
            return Some(linearize_sibling_tips(prefix, orders));
        }
    }

    None
}

/// Folds every directly-extending sibling block into `winner` in one pass,
/// instead of leaving all but one of them to win a future round.
///
/// Several peers proposing at the same tip simultaneously (none of their
/// blocks yet known to each other) show up here as distinct orders that
/// each extend `winner` by exactly one differing block. Taking only the
/// single highest-voted one and discarding the rest would need one round
/// per straggler to fold in; instead every distinct next block is
/// collected, deduplicated by hash, and appended in ascending block-hash
/// order (the same tie-break `select_winning_chain` already uses), giving a
/// total order all peers compute identically without another round of
/// voting. Repeats at the new tip so a second layer of simultaneous
/// proposals (peers whose pending block extends the just-appended one)
/// folds in in the same pass.
fn linearize_sibling_tips(mut winner: Vector<Block>, orders: &[(AccountKey, Order)]) -> Vector<Block> {
    loop {
        let base = winner.count();
        let mut seen = StdHashSet::new();
        let mut tips: Vec<Block> = Vec::new();
        for (_, order) in orders {
            if order.blocks().count() > base && order.blocks().common_prefix_length(&winner) >= base {
                let next = order.blocks().get(base).clone();
                if seen.insert(next.hash()) {
                    tips.push(next);
                }
            }
        }
        if tips.is_empty() {
            return winner;
        }
        tips.sort_by_key(Block::hash);
        for block in tips {
            winner = winner.append(block);
        }
    }
}

fn final_block_hash(chain: &Vector<Block>) -> Option<shared_types::Hash> {
    if chain.count() == 0 {
        None
    } else {
        Some(chain.get(chain.count() - 1).hash())
    }
}

/// Replace `old_self`'s blocks with `winner`, then re-append any blocks
/// `old_self` already had beyond its common prefix with `winner` that
/// `winner` doesn't already hold somewhere — locally proposed blocks the
/// winning chain hasn't picked up yet. `winner` may fold in a pending block
/// at a different position than `old_self` held it (see
/// `linearize_sibling_tips`), so containment is checked by hash across all
/// of `winner` rather than assumed to only ever happen past the common
/// prefix. Returns `old_self`'s own blocks unchanged if adopting `winner`
/// would shrink the chain below `old_self`'s `consensusPoint` (finality is
/// irrevocable).
pub fn update_own_blocks(old_self: &Order, winner: &Vector<Block>) -> Vector<Block> {
    if (winner.count() as i64) < old_self.consensus_point() {
        return old_self.blocks().clone();
    }
    let already_included: StdHashSet<shared_types::Hash> = (0..winner.count()).map(|i| winner.get(i).hash()).collect();
    let cp = old_self.blocks().common_prefix_length(winner);
    let mut blocks = winner.clone();
    for i in cp..old_self.blocks().count() {
        let block = old_self.blocks().get(i).clone();
        if !already_included.contains(&block.hash()) {
            blocks = blocks.append(block);
        }
    }
    blocks
}

/// Largest prefix length `L` of `self_blocks` for which the stake of every
/// peer whose own chain shares at least an `L`-long common prefix with
/// `self_blocks` exceeds `totalStake * 2/3`. Never
/// returns less than `floor`, since `proposalPoint` is monotone.
pub fn advance_proposal_point(
    self_blocks: &Vector<Block>,
    orders: &[(AccountKey, Order)],
    stake_of: impl Fn(&AccountKey) -> i64,
    total_stake: i64,
    floor: i64,
) -> i64 {
    let n = self_blocks.count() as i64;
    let mut best = floor;
    for l in (floor..=n).rev() {
        let support: i64 = orders
            .iter()
            .map(|(key, order)| {
                if order.blocks().common_prefix_length(self_blocks) as i64 >= l { stake_of(key) } else { 0 }
            })
            .sum();
        if support * 3 > total_stake * 2 {
            best = l;
            break;
        }
    }
    best
}

/// Largest prefix length `L <= proposalPoint` for which the stake of every
/// peer whose own `proposalPoint >= L` *and* whose chain shares at least an
/// `L`-long common prefix with `self_blocks` exceeds `totalStake * 2/3`
///. Never returns less than `floor`.
pub fn advance_consensus_point(
    self_blocks: &Vector<Block>,
    proposal_point: i64,
    orders: &[(AccountKey, Order)],
    stake_of: impl Fn(&AccountKey) -> i64,
    total_stake: i64,
    floor: i64,
) -> i64 {
    let mut best = floor;
    for l in (floor..=proposal_point).rev() {
        let support: i64 = orders
            .iter()
            .map(|(key, order)| {
                if order.proposal_point() >= l && order.blocks().common_prefix_length(self_blocks) as i64 >= l {
                    stake_of(key)
                } else {
                    0
                }
            })
            .sum();
        if support * 3 > total_stake * 2 {
            best = l;
            break;
        }
    }
    best
}
