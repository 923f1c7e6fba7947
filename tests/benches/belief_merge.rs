//! Benchmarks for the two operations most performance-sensitive to
//! convergence speed: trie assoc/get under load, and merging beliefs
//! across a growing number of peers.

use std::time::Duration;

use cc_02_collections::HashMap;
use cc_04_state::{AccountStatus, Belief, DefaultExecutor, PeerStatus, State};
use cc_05_consensus::Peer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shared_crypto::signatures::Ed25519KeyPair;
use shared_types::AccountKey;

fn bench_trie_assoc(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie/assoc");
    for count in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("build", count), &count, |b, &count| {
            b.iter(|| {
                let mut map: HashMap<i64, i64> = HashMap::new();
                for i in 0..count as i64 {
                    map = map.assoc(i, i * 2);
                }
                black_box(map.count())
            })
        });
    }
    group.finish();
}

fn bench_trie_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie/get");
    for count in [100usize, 1_000, 10_000] {
        let map: HashMap<i64, i64> = (0..count as i64).fold(HashMap::new(), |m, i| m.assoc(i, i * 2));
        group.bench_with_input(BenchmarkId::new("lookup", count), &count, |b, &count| {
            b.iter(|| black_box(map.get(&((count / 2) as i64))))
        });
    }
    group.finish();
}

fn genesis_for(keys: &[AccountKey]) -> State {
    let mut state = State::genesis();
    for key in keys {
        state = state.with_peer(*key, PeerStatus::new(100));
    }
    for _ in keys {
        let (next, _) = state.with_new_account(AccountStatus::new(1_000, 0));
        state = next;
    }
    state
}

fn bench_belief_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("consensus/belief_merge");
    group.measurement_time(Duration::from_secs(10));

    for peer_count in [4usize, 16, 32] {
        let seeds: Vec<[u8; 32]> = (0..peer_count as u8).map(|i| [i; 32]).collect();
        let keys: Vec<AccountKey> = seeds
            .iter()
            .map(|seed| AccountKey::from_bytes(*Ed25519KeyPair::from_seed(*seed).public_key().as_bytes()))
            .collect();
        let genesis = genesis_for(&keys);

        group.bench_with_input(BenchmarkId::new("merge_one_block_each", peer_count), &peer_count, |b, _| {
            b.iter(|| {
                let mut peers: Vec<Peer<DefaultExecutor>> = seeds
                    .iter()
                    .map(|seed| Peer::new(Ed25519KeyPair::from_seed(*seed), genesis.clone(), DefaultExecutor))
                    .collect();
                let beliefs: Vec<Belief> = peers.iter().map(|p| p.belief().clone()).collect();
                for peer in peers.iter_mut() {
                    black_box(peer.merge_beliefs(&beliefs).unwrap());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(
    name = belief_merge_benches;
    config = Criterion::default().sample_size(30);
    targets = bench_trie_assoc, bench_trie_get, bench_belief_merge,
);
criterion_main!(belief_merge_benches);
