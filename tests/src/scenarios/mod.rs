//! Workspace-level end-to-end scenarios, each exercised against real
//! `cc-05-consensus::Peer`s talking over
//! `node_runtime::InProcessNetwork`.

pub mod encoding_flood;
pub mod malicious_peer;
pub mod missing_data_recovery;
pub mod multi_block_consensus;
pub mod partial_gossip;
pub mod single_block_consensus;

#[cfg(test)]
pub(crate) mod fixtures {
    use cc_04_state::{AccountStatus, PeerStatus, State};
    use shared_crypto::signatures::Ed25519KeyPair;
    use shared_types::AccountKey;

    /// `count` fresh keypairs and their derived `AccountKey`s.
    pub fn keypairs(count: usize) -> (Vec<Ed25519KeyPair>, Vec<AccountKey>) {
        let keypairs: Vec<Ed25519KeyPair> = (0..count).map(|_| Ed25519KeyPair::generate()).collect();
        let keys = keypairs.iter().map(|kp| AccountKey::from_bytes(*kp.public_key().as_bytes())).collect();
        (keypairs, keys)
    }

    /// A genesis `State` with one equal-stake peer entry per key and one
    /// account per key at `balance_of(index)`, in key order (so `Address::new(i)`
    /// addresses peer `i`'s account).
    pub fn genesis_with_accounts(keys: &[AccountKey], stake_per_peer: i64, balance_of: impl Fn(usize) -> i64) -> State {
        let mut state = State::genesis();
        for key in keys {
            state = state.with_peer(*key, PeerStatus::new(stake_per_peer));
        }
        for (i, _) in keys.iter().enumerate() {
            let (next, _) = state.with_new_account(AccountStatus::new(balance_of(i), 0));
            state = next;
        }
        state
    }
}
