//! An in-process stand-in for the gossip transport. No
//! socket is involved, but `write_message`/`read_message` still do the
//! real wire encoding, and each peer's mailbox enforces the same bounded
//! queue back-pressure a [`FrameSink`] over a real connection would.

use std::collections::{HashMap as StdHashMap, VecDeque};

use cc_06_wire::{read_message, write_message, FrameSink, Message, SendError};
use shared_types::AccountKey;

/// One peer's bounded inbound frame queue.
struct Mailbox {
    queue: VecDeque<Vec<u8>>,
    capacity: usize,
}

impl Mailbox {
    fn new(capacity: usize) -> Mailbox {
        Mailbox { queue: VecDeque::new(), capacity }
    }
}

impl FrameSink for Mailbox {
    fn try_send_frame(&mut self, frame: Vec<u8>) -> Result<(), SendError> {
        if self.queue.len() >= self.capacity {
            return Err(SendError::Full);
        }
        self.queue.push_back(frame);
        Ok(())
    }
}

/// Every participating peer's mailbox, addressed by [`AccountKey`].
pub struct InProcessNetwork {
    mailboxes: StdHashMap<AccountKey, Mailbox>,
}

impl InProcessNetwork {
    /// One empty, bounded mailbox per peer in `peer_keys`.
    pub fn new(peer_keys: impl IntoIterator<Item = AccountKey>, capacity: usize) -> InProcessNetwork {
        InProcessNetwork { mailboxes: peer_keys.into_iter().map(|k| (k, Mailbox::new(capacity))).collect() }
    }

    /// Encode `message` once and enqueue it in every mailbox but `from`'s
    /// own. Returns the peers whose mailbox rejected the frame.
    pub fn gossip(&mut self, from: AccountKey, message: &Message) -> Vec<(AccountKey, SendError)> {
        let mut frame = Vec::new();
        write_message(message, &mut frame);
        let mut rejected = Vec::new();
        for (&key, mailbox) in self.mailboxes.iter_mut() {
            if key == from {
                continue;
            }
            if let Err(e) = mailbox.try_send_frame(frame.clone()) {
                rejected.push((key, e));
            }
        }
        rejected
    }

    /// Like [`gossip`](Self::gossip) but addressed to a bounded subset of
    /// peers rather than the full mailbox set, for simulating limited
    /// fanout instead of full broadcast.
    pub fn gossip_to(&mut self, from: AccountKey, targets: &[AccountKey], message: &Message) -> Vec<(AccountKey, SendError)> {
        let mut frame = Vec::new();
        write_message(message, &mut frame);
        let mut rejected = Vec::new();
        for &key in targets {
            if key == from {
                continue;
            }
            if let Some(mailbox) = self.mailboxes.get_mut(&key) {
                if let Err(e) = mailbox.try_send_frame(frame.clone()) {
                    rejected.push((key, e));
                }
            }
        }
        rejected
    }

    /// Drain and decode every frame waiting in `peer`'s mailbox, in arrival
    /// order. A frame that fails to decode is dropped rather than aborting
    /// the drain: a malformed message from one peer must not block
    /// delivery of the rest.
    pub fn receive(&mut self, peer: AccountKey) -> Vec<Message> {
        let Some(mailbox) = self.mailboxes.get_mut(&peer) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        while let Some(frame) = mailbox.queue.pop_front() {
            if let Ok((message, _)) = read_message(&frame) {
                out.push(message);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> AccountKey {
        AccountKey::from_bytes([b; 32])
    }

    #[test]
    fn gossip_skips_sender_and_reaches_every_other_peer() {
        let mut net = InProcessNetwork::new([key(1), key(2), key(3)], 8);
        let belief = cc_04_state::Belief::empty(0);
        net.gossip(key(1), &Message::Belief(belief));
        assert_eq!(net.receive(key(1)).len(), 0);
        assert_eq!(net.receive(key(2)).len(), 1);
        assert_eq!(net.receive(key(3)).len(), 1);
    }

    #[test]
    fn full_mailbox_reports_send_error() {
        let mut net = InProcessNetwork::new([key(1), key(2)], 1);
        let belief = cc_04_state::Belief::empty(0);
        let rejected_first = net.gossip(key(1), &Message::Belief(belief.clone()));
        assert!(rejected_first.is_empty());
        let rejected_second = net.gossip(key(1), &Message::Belief(belief));
        assert_eq!(rejected_second, vec![(key(2), SendError::Full)]);
    }

    #[test]
    fn gossip_to_reaches_only_named_targets() {
        let mut net = InProcessNetwork::new([key(1), key(2), key(3)], 8);
        let belief = cc_04_state::Belief::empty(0);
        net.gossip_to(key(1), &[key(2)], &Message::Belief(belief));
        assert_eq!(net.receive(key(2)).len(), 1);
        assert_eq!(net.receive(key(3)).len(), 0);
    }

    #[test]
    fn unaddressed_peer_receives_nothing() {
        let mut net = InProcessNetwork::new([key(1)], 8);
        assert!(net.receive(key(9)).is_empty());
    }
}
