//! # Consensus Events
//!
//! Lifecycle events published by a `Peer` as it ingests beliefs and applies
//! consensus. These are the choreography events that flow through the bus;
//! they are *not* the wire messages peers exchange over the network (see
//! `cc-06-wire` for those).

use serde::{Deserialize, Serialize};
use shared_types::{AccountKey, Hash};

/// All events a `Peer` can publish while running the belief-merge engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConsensusEvent {
    /// A `Belief` was received from a peer and queued for merge.
    BeliefReceived {
        /// The peer the belief was received from.
        from: AccountKey,
    },

    /// `mergeBeliefs` ran to completion and produced a new own-Belief.
    BeliefMerged {
        /// Hash of the peer's own Order after the merge.
        own_order_hash: Hash,
        /// proposalPoint after the merge.
        proposal_point: u64,
        /// consensusPoint after the merge.
        consensus_point: u64,
    },

    /// proposalPoint advanced this round.
    ProposalAdvanced {
        /// Previous proposalPoint.
        from: u64,
        /// New proposalPoint.
        to: u64,
    },

    /// consensusPoint advanced this round; triggers state
    /// catch-up over blocks `[from, to)`.
    ConsensusAdvanced {
        /// Previous consensusPoint.
        from: u64,
        /// New consensusPoint.
        to: u64,
    },

    /// An Order entry was dropped during merge without aborting it
    /// (bad signature, stale timestamp, or stale consensusPoint).
    OrderEntryDropped {
        /// The peer whose entry was dropped.
        peer: AccountKey,
        /// Why it was dropped.
        reason: DropReason,
    },

    /// A block locally proposed via `proposeBlock` was appended to the
    /// peer's own Order.
    BlockProposed {
        /// Hash of the proposed block.
        block_hash: Hash,
        /// Its position in the peer's Order after the append.
        index: u64,
    },
}

/// Why an Order entry was dropped during a merge round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    /// `SignedData::verify` failed.
    BadSignature,
    /// The entry's signature verifies, but under a public key different
    /// from the `AccountKey` it was filed under in the orders map — a
    /// validly-signed Order smuggled in under someone else's identity.
    KeyMismatch,
    /// The signed Order's timestamp did not advance past the last observed
    /// timestamp from that peer.
    StaleTimestamp,
    /// The received consensusPoint was not ahead of the last observed one.
    StaleConsensusPoint,
}

impl ConsensusEvent {
    /// Topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BeliefReceived { .. } => EventTopic::Gossip,
            Self::BeliefMerged { .. } | Self::ProposalAdvanced { .. } => EventTopic::Merge,
            Self::ConsensusAdvanced { .. } => EventTopic::Finality,
            Self::OrderEntryDropped { .. } => EventTopic::DeadLetterQueue,
            Self::BlockProposed { .. } => EventTopic::Proposal,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Incoming gossip (belief receipt).
    Gossip,
    /// Belief-merge outcomes.
    Merge,
    /// Local block proposals.
    Proposal,
    /// consensusPoint advancement / state catch-up.
    Finality,
    /// Dropped/invalid entries.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ConsensusEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> AccountKey {
        AccountKey::from_bytes([1u8; 32])
    }

    #[test]
    fn test_event_topic_mapping() {
        let event = ConsensusEvent::ConsensusAdvanced { from: 1, to: 2 };
        assert_eq!(event.topic(), EventTopic::Finality);
    }

    #[test]
    fn test_filter_all() {
        let filter = EventFilter::all();
        let event = ConsensusEvent::BeliefReceived { from: sample_key() };
        assert!(filter.matches(&event));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Finality]);

        let consensus_event = ConsensusEvent::ConsensusAdvanced { from: 0, to: 1 };
        assert!(filter.matches(&consensus_event));

        let gossip_event = ConsensusEvent::BeliefReceived { from: sample_key() };
        assert!(!filter.matches(&gossip_event));
    }

    #[test]
    fn test_dropped_entry_event() {
        let event = ConsensusEvent::OrderEntryDropped {
            peer: sample_key(),
            reason: DropReason::BadSignature,
        };
        assert_eq!(event.topic(), EventTopic::DeadLetterQueue);
    }
}
