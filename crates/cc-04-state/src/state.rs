//! `State`: the consensed chain state applied after every block. Accounts
//! are addressed positionally (an `Address` is an index into
//! `accounts`); peers and the pending schedule are keyed by raw bytes so
//! lookups and iteration order stay independent of hash, unlike
//! `Belief.orders`.

use cc_01_encoding::cell::Cell;
use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::refs::Ref;
use cc_01_encoding::tag::{RecordTag, Tag};
use cc_02_collections::{BlobMap, Vector};
use shared_types::AccountKey;

use crate::account::{AccountStatus, PeerStatus};
use crate::block::expect_record;
use crate::signed::SignedData;
use crate::transaction::Transaction;

/// The full consensed chain state.
#[derive(Clone)]
pub struct State {
    accounts: Vector<AccountStatus>,
    peers: BlobMap<AccountKey, PeerStatus>,
    globals: Vector<Cell>,
    schedule: BlobMap<i64, Vector<SignedData<Transaction>>>,
}

impl State {
    pub fn new(
        accounts: Vector<AccountStatus>,
        peers: BlobMap<AccountKey, PeerStatus>,
        globals: Vector<Cell>,
        schedule: BlobMap<i64, Vector<SignedData<Transaction>>>,
    ) -> State {
        State { accounts, peers, globals, schedule }
    }

    /// Genesis state: no accounts, no peers, no globals, nothing scheduled.
    pub fn genesis() -> State {
        State { accounts: Vector::new(), peers: BlobMap::new(), globals: Vector::new(), schedule: BlobMap::new() }
    }

    pub fn accounts(&self) -> &Vector<AccountStatus> {
        &self.accounts
    }

    pub fn peers(&self) -> &BlobMap<AccountKey, PeerStatus> {
        &self.peers
    }

    pub fn globals(&self) -> &Vector<Cell> {
        &self.globals
    }

    pub fn schedule(&self) -> &BlobMap<i64, Vector<SignedData<Transaction>>> {
        &self.schedule
    }

    /// Replace the account at `index`.
    pub fn with_account(&self, index: usize, status: AccountStatus) -> State {
        State {
            accounts: self.accounts.update(index, status),
            peers: self.peers.clone(),
            globals: self.globals.clone(),
            schedule: self.schedule.clone(),
        }
    }

    /// Append a fresh account, returning its new index.
    pub fn with_new_account(&self, status: AccountStatus) -> (State, usize) {
        let index = self.accounts.count();
        (
            State {
                accounts: self.accounts.append(status),
                peers: self.peers.clone(),
                globals: self.globals.clone(),
                schedule: self.schedule.clone(),
            },
            index,
        )
    }

    /// Replace or insert a peer's status.
    pub fn with_peer(&self, key: AccountKey, status: PeerStatus) -> State {
        State {
            accounts: self.accounts.clone(),
            peers: self.peers.assoc(key, status),
            globals: self.globals.clone(),
            schedule: self.schedule.clone(),
        }
    }

    /// Append a value to `globals`.
    pub fn with_global(&self, value: Cell) -> State {
        State {
            accounts: self.accounts.clone(),
            peers: self.peers.clone(),
            globals: self.globals.append(value),
            schedule: self.schedule.clone(),
        }
    }

    /// Add `delta` to a peer's stake, inserting a zero-balance entry first
    /// if the peer is unknown. Used to route collected juice to the block
    /// producer. This preserves the conservation property: fees are
    /// redistributed within `State`, never destroyed.
    pub fn with_peer_stake_delta(&self, key: &AccountKey, delta: i64) -> State {
        let current = self.peers.get(key).copied().unwrap_or_else(|| PeerStatus::new(0));
        self.with_peer(*key, current.with_stake(current.stake() + delta))
    }

    /// Stake-weighted voting power of `key`, or zero if not a known peer.
    pub fn stake_of(&self, key: &AccountKey) -> i64 {
        self.peers.get(key).map(|p| p.stake()).unwrap_or(0)
    }

    pub fn total_stake(&self) -> i64 {
        self.peers.entries_sorted().iter().map(|(_, p)| p.stake()).sum()
    }

    /// Sum of every account balance, peer stake and scheduled-transaction
    /// reserve: the quantity every successful transaction application must
    /// preserve. `schedule` is never
    /// populated by `DefaultExecutor` (scheduled-action execution is part of
    /// the CVM-level semantics this crate's Non-goals exclude), so this term
    /// is always zero today; it is still summed rather than omitted so the
    /// formula stays correct if a future executor starts reserving funds
    /// against scheduled transactions.
    pub fn compute_total_funds(&self) -> i64 {
        let account_total: i64 = self.accounts.iter().map(|a| a.balance()).sum();
        let peer_total: i64 = self.peers.entries_sorted().iter().map(|(_, p)| p.stake()).sum();
        let schedule_total: i64 = self
            .schedule
            .entries_sorted()
            .iter()
            .flat_map(|(_, txs)| txs.iter())
            .filter_map(|signed| signed.value())
            .map(|tx| match tx.payload() {
                crate::transaction::TransactionPayload::Transfer { amount, .. } => *amount,
            })
            .sum();
        account_total + peer_total + schedule_total
    }
}

impl Encode for State {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(Tag::Record as u8);
        out.push(RecordTag::State as u8);
        Ref::of(self.accounts.clone()).encode(out);
        Ref::of(self.peers.clone()).encode(out);
        Ref::of(self.globals.clone()).encode(out);
        Ref::of(self.schedule.clone()).encode(out);
    }
}

impl Decode for State {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut pos = expect_record(input, RecordTag::State)?;
        let (accounts, n) = Ref::<Vector<AccountStatus>>::decode(&input[pos..])?;
        pos += n;
        let accounts = embedded_or_err(accounts, "state accounts")?;
        let (peers, n) = Ref::<BlobMap<AccountKey, PeerStatus>>::decode(&input[pos..])?;
        pos += n;
        let peers = embedded_or_err(peers, "state peers")?;
        let (globals, n) = Ref::<Vector<Cell>>::decode(&input[pos..])?;
        pos += n;
        let globals = embedded_or_err(globals, "state globals")?;
        let (schedule, n) = Ref::<BlobMap<i64, Vector<SignedData<Transaction>>>>::decode(&input[pos..])?;
        pos += n;
        let schedule = embedded_or_err(schedule, "state schedule")?;
        Ok((State { accounts, peers, globals, schedule }, pos))
    }
}

fn embedded_or_err<T>(r: Ref<T>, what: &str) -> Result<T, CodecError> {
    match r {
        Ref::Embedded(v) => Ok(v),
        Ref::Indirect(_) => Err(CodecError::BadFormat(format!("{what} ref is indirect in bare decode"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_has_zero_funds() {
        let state = State::genesis();
        assert_eq!(state.compute_total_funds(), 0);
    }

    #[test]
    fn with_new_account_preserves_total_funds_and_is_appended() {
        let state = State::genesis();
        let (state, idx) = state.with_new_account(AccountStatus::new(1_000_000, 0));
        assert_eq!(idx, 0);
        assert_eq!(state.accounts().count(), 1);
        assert_eq!(state.compute_total_funds(), 1_000_000);
    }

    #[test]
    fn stake_delta_moves_funds_between_peers_without_changing_total() {
        let key_a = AccountKey::from_bytes([1u8; 32]);
        let key_b = AccountKey::from_bytes([2u8; 32]);
        let state = State::genesis().with_peer(key_a, PeerStatus::new(100)).with_peer(key_b, PeerStatus::new(0));
        let before = state.compute_total_funds();
        let state = state.with_peer_stake_delta(&key_a, -10).with_peer_stake_delta(&key_b, 10);
        assert_eq!(state.compute_total_funds(), before);
        assert_eq!(state.stake_of(&key_a), 90);
        assert_eq!(state.stake_of(&key_b), 10);
    }

    #[test]
    fn with_global_appends_without_affecting_funds() {
        let state = State::genesis().with_peer(AccountKey::from_bytes([4u8; 32]), PeerStatus::new(10));
        let before = state.compute_total_funds();
        let state = state.with_global(Cell::Str("chain-name".to_owned()));
        assert_eq!(state.globals().count(), 1);
        assert_eq!(state.compute_total_funds(), before);
    }

    #[test]
    fn scheduled_transaction_reserves_count_toward_total_funds() {
        use crate::transaction::{Transaction, TransactionPayload};
        use shared_crypto::signatures::Ed25519KeyPair;
        use shared_types::Address;

        let signer = Ed25519KeyPair::generate();
        let tx = Transaction::new(Address::new(0), 1, TransactionPayload::Transfer { target: Address::new(1), amount: 250 });
        let signed = SignedData::sign(&signer, tx);
        let scheduled = Vector::new().append(signed);
        let state = State::genesis().with_peer(AccountKey::from_bytes([6u8; 32]), PeerStatus::new(10));
        let state = State::new(state.accounts().clone(), state.peers().clone(), state.globals().clone(), state.schedule().clone().assoc(100, scheduled));
        assert_eq!(state.compute_total_funds(), 260);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let state = State::genesis()
            .with_peer(AccountKey::from_bytes([3u8; 32]), PeerStatus::new(500))
            .with_global(Cell::Long(42));
        let bytes = state.to_bytes();
        let (decoded, n) = State::decode(&bytes).unwrap();
        assert_eq!(n, bytes.len());
        assert_eq!(decoded.total_stake(), 500);
    }
}
