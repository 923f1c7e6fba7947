//! Persistent `HashMap<K, V>`: a 16-way radix trie keyed on `hash(K)` (spec
//! §3, §4.2).

use std::rc::Rc;

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::tag::Tag;

use crate::trie::{decode_node, encode_node, hash_digits, HashDigits, Node};

fn digitize<K: Encode>(k: &K) -> HashDigits {
    hash_digits(&shared_crypto::hashing::blake3_hash(&k.to_bytes()))
}

/// Immutable hash map from `K` to `V`, represented as a radix trie over
/// `hash(K)` with a flat-leaf collapse below [`crate::config::LEAF_MAX`]
/// entries.
#[derive(Clone)]
pub struct HashMap<K, V> {
    root: Rc<Node<HashDigits, K, V>>,
}

impl<K: Clone + PartialEq, V: Clone> Default for HashMap<K, V> {
    fn default() -> Self {
        HashMap { root: Rc::new(Node::empty()) }
    }
}

impl<K: Encode + Clone + PartialEq, V: Clone> HashMap<K, V> {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// `O(log₁₆ n)` lookup.
    pub fn get(&self, k: &K) -> Option<&V> {
        self.root.get(&digitize(k), k)
    }

    /// `O(log₁₆ n)` membership test.
    pub fn contains_key(&self, k: &K) -> bool {
        self.root.contains_key(&digitize(k), k)
    }

    /// Insert or replace a binding, returning the updated map.
    pub fn assoc(&self, k: K, v: V) -> Self {
        let d = digitize(&k);
        HashMap { root: Rc::new(self.root.assoc(d, k, v)) }
    }

    /// Remove a binding, returning the updated map (a no-op map if `k` was
    /// absent).
    pub fn dissoc(&self, k: &K) -> Self {
        let d = digitize(k);
        match self.root.dissoc(&d, k) {
            Some(n) => HashMap { root: Rc::new(n) },
            None => HashMap::new(),
        }
    }

    /// All entries, in an unspecified but deterministic-for-equal-maps
    /// order.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.root.entries().into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    /// Walk `a` and `b` together, calling `f(key, a_value, b_value)` for
    /// every key present in either map. Subtrees that are the same `Rc`
    /// allocation in both maps are skipped without descending — the
    /// in-memory analog of "subtrees whose refs compare equal by hash are
    /// skipped entirely", since an unchanged persistent subtree is
    /// physically shared rather than merely hash-equal.
    pub fn merge_differences<F>(a: &Self, b: &Self, mut f: F)
    where
        F: FnMut(&K, Option<&V>, Option<&V>),
    {
        if Rc::ptr_eq(&a.root, &b.root) {
            return;
        }
        let a_entries = a.root.entries();
        let b_entries = b.root.entries();
        for (_, k, v) in &a_entries {
            f(k, Some(v), b.get(k));
        }
        for (_, k, v) in &b_entries {
            if a.get(k).is_none() {
                f(k, None, Some(v));
            }
        }
    }
}

impl<K: Encode + Clone + PartialEq, V: Encode + Clone> HashMap<K, V> {
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        encode_node(Tag::Map, &self.root, out);
    }
}

impl<K: Encode + Clone + PartialEq, V: Encode + Clone> Encode for HashMap<K, V> {
    fn encode(&self, out: &mut Vec<u8>) {
        self.encode_into(out);
    }
}

impl<K: Decode + Encode + Clone + PartialEq, V: Decode + Encode + Clone> Decode for HashMap<K, V> {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let (node, n) = decode_node(Tag::Map, input, &digitize::<K>, 0)?;
        Ok((HashMap { root: Rc::new(node) }, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assoc_then_get() {
        let m: HashMap<i64, String> = HashMap::new();
        let m = m.assoc(1, "one".to_owned());
        let m = m.assoc(2, "two".to_owned());
        assert_eq!(m.get(&1), Some(&"one".to_owned()));
        assert_eq!(m.get(&2), Some(&"two".to_owned()));
        assert_eq!(m.get(&3), None);
    }

    #[test]
    fn collection_law_get_assoc() {
        let m: HashMap<i64, i64> = HashMap::new();
        for k in 0..30i64 {
            let m2 = m.assoc(k, k * 10);
            assert_eq!(m2.get(&k), Some(&(k * 10)));
        }
    }

    #[test]
    fn collection_law_dissoc_assoc() {
        let m: HashMap<i64, i64> = HashMap::new();
        let m = m.assoc(5, 50);
        let had_key = m.contains_key(&5);
        let m_with = m.assoc(5, 999);
        let m_without = m_with.dissoc(&5);
        assert_eq!(m_without.contains_key(&5), false);
        assert_eq!(had_key, true);
    }

    #[test]
    fn collection_law_count() {
        let m: HashMap<i64, i64> = HashMap::new();
        let before = m.count();
        let had = m.contains_key(&42);
        let m2 = m.assoc(42, 1);
        assert_eq!(m2.count(), before + if had { 0 } else { 1 });
    }

    #[test]
    fn many_insertions_become_tree_and_stay_correct() {
        let mut m: HashMap<i64, i64> = HashMap::new();
        for k in 0..500i64 {
            m = m.assoc(k, k);
        }
        assert_eq!(m.count(), 500);
        for k in 0..500i64 {
            assert_eq!(m.get(&k), Some(&k));
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut m: HashMap<i64, i64> = HashMap::new();
        for k in 0..20i64 {
            m = m.assoc(k, k * 2);
        }
        let bytes = m.to_bytes();
        let (decoded, n) = HashMap::<i64, i64>::decode(&bytes).unwrap();
        assert_eq!(n, bytes.len());
        for k in 0..20i64 {
            assert_eq!(decoded.get(&k), Some(&(k * 2)));
        }
    }

    #[test]
    fn equal_maps_encode_identically_regardless_of_insertion_order() {
        let mut a: HashMap<i64, i64> = HashMap::new();
        for k in [3, 1, 2] {
            a = a.assoc(k, k);
        }
        let mut b: HashMap<i64, i64> = HashMap::new();
        for k in [1, 2, 3] {
            b = b.assoc(k, k);
        }
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn merge_differences_reports_divergent_keys_only() {
        let base: HashMap<i64, i64> = HashMap::new();
        let base = base.assoc(1, 1).assoc(2, 2).assoc(3, 3);
        let a = base.assoc(4, 4);
        let b = base.assoc(5, 5);
        let mut diffs = Vec::new();
        HashMap::merge_differences(&a, &b, |k, av, bv| diffs.push((*k, av.copied(), bv.copied())));
        diffs.sort();
        assert_eq!(diffs, vec![(4, Some(4), None), (5, None, Some(5))]);
    }
}
