//! Persistent `HashSet<K>`: the same radix-trie shape as
//! [`crate::hashmap::HashMap`] without values, plus the four merge
//! operations (union, intersection, and the two one-sided diffs) defined
//! over it.

use std::rc::Rc;

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::tag::Tag;

use crate::trie::{decode_node, encode_node, hash_digits, HashDigits, Node};

fn digitize<K: Encode>(k: &K) -> HashDigits {
    hash_digits(&shared_crypto::hashing::blake3_hash(&k.to_bytes()))
}

/// Immutable set of `K`, mirroring [`crate::hashmap::HashMap`]'s trie shape
/// with a unit value.
#[derive(Clone)]
pub struct HashSet<K> {
    root: Rc<Node<HashDigits, K, ()>>,
}

impl<K: Clone + PartialEq> Default for HashSet<K> {
    fn default() -> Self {
        HashSet { root: Rc::new(Node::empty()) }
    }
}

impl<K: Encode + Clone + PartialEq> HashSet<K> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// `O(log₁₆ n)` membership test.
    pub fn contains(&self, k: &K) -> bool {
        self.root.contains_key(&digitize(k), k)
    }

    /// Insert `k`, returning the updated set.
    pub fn insert(&self, k: K) -> Self {
        let d = digitize(&k);
        HashSet { root: Rc::new(self.root.assoc(d, k, ())) }
    }

    /// Remove `k`, returning the updated set.
    pub fn remove(&self, k: &K) -> Self {
        let d = digitize(k);
        match self.root.dissoc(&d, k) {
            Some(n) => HashSet { root: Rc::new(n) },
            None => HashSet::new(),
        }
    }

    /// All elements, in an unspecified but deterministic-for-equal-sets
    /// order.
    pub fn elements(&self) -> Vec<K> {
        self.root.entries().into_iter().map(|(_, k, _)| k).collect()
    }

    /// Elements present in either `a` or `b`.
    pub fn union(a: &Self, b: &Self) -> Self {
        if Rc::ptr_eq(&a.root, &b.root) {
            return a.clone();
        }
        let mut out = a.clone();
        for k in b.elements() {
            out = out.insert(k);
        }
        out
    }

    /// Elements present in both `a` and `b`.
    pub fn intersection(a: &Self, b: &Self) -> Self {
        if Rc::ptr_eq(&a.root, &b.root) {
            return a.clone();
        }
        let mut out = HashSet::new();
        for k in a.elements() {
            if b.contains(&k) {
                out = out.insert(k);
            }
        }
        out
    }

    /// Elements present in `a` but not `b`.
    pub fn diff_left(a: &Self, b: &Self) -> Self {
        if Rc::ptr_eq(&a.root, &b.root) {
            return HashSet::new();
        }
        let mut out = HashSet::new();
        for k in a.elements() {
            if !b.contains(&k) {
                out = out.insert(k);
            }
        }
        out
    }

    /// Elements present in `b` but not `a`.
    pub fn diff_right(a: &Self, b: &Self) -> Self {
        Self::diff_left(b, a)
    }
}

impl<K: Encode + Clone + PartialEq> Encode for HashSet<K> {
    fn encode(&self, out: &mut Vec<u8>) {
        encode_node(Tag::Set, &self.root, out);
    }
}

impl<K: Decode + Encode + Clone + PartialEq> Decode for HashSet<K> {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let (node, n) = decode_node(Tag::Set, input, &digitize::<K>, 0)?;
        Ok((HashSet { root: Rc::new(node) }, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(xs: &[i64]) -> HashSet<i64> {
        let mut s = HashSet::new();
        for &x in xs {
            s = s.insert(x);
        }
        s
    }

    #[test]
    fn insert_then_contains() {
        let s = set_of(&[1, 2, 3]);
        assert!(s.contains(&1));
        assert!(!s.contains(&4));
        assert_eq!(s.count(), 3);
    }

    #[test]
    fn remove_drops_count() {
        let s = set_of(&[1, 2, 3]);
        let s2 = s.remove(&2);
        assert_eq!(s2.count(), 2);
        assert!(!s2.contains(&2));
    }

    #[test]
    fn union_keeps_either_side() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[3, 4, 5]);
        let u = HashSet::union(&a, &b);
        let mut elems = u.elements();
        elems.sort();
        assert_eq!(elems, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn intersection_keeps_only_both() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[2, 3, 4]);
        let i = HashSet::intersection(&a, &b);
        let mut elems = i.elements();
        elems.sort();
        assert_eq!(elems, vec![2, 3]);
    }

    #[test]
    fn diff_left_keeps_left_only() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[2, 3, 4]);
        let d = HashSet::diff_left(&a, &b);
        assert_eq!(d.elements(), vec![1]);
    }

    #[test]
    fn diff_right_keeps_right_only() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[2, 3, 4]);
        let d = HashSet::diff_right(&a, &b);
        assert_eq!(d.elements(), vec![4]);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let s = set_of(&(0..30).collect::<Vec<_>>());
        let bytes = s.to_bytes();
        let (decoded, n) = HashSet::<i64>::decode(&bytes).unwrap();
        assert_eq!(n, bytes.len());
        assert_eq!(decoded.count(), 30);
    }
}
