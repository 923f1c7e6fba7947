//! Persistent `BlobMap<K, V>`: a long-prefix trie keyed on a key's raw
//! bytes rather than a hash of it, so numeric and byte-string keys stay
//! ordered. Used for `State.schedule` (keyed on block
//! timestamp) and `Peer.stateHistory` (keyed on `consensusPoint`).

use std::rc::Rc;

use cc_01_encoding::codec::{Decode, Encode};
use cc_01_encoding::error::CodecError;
use cc_01_encoding::tag::Tag;
use shared_types::AccountKey;

use crate::trie::{decode_node, encode_node, BytesDigits, Node};

/// A key whose own bytes (not a hash of them) determine its trie position.
pub trait BlobKey {
    /// Big-endian / lexicographic byte representation used for trie
    /// descent.
    fn key_bytes(&self) -> Vec<u8>;
}

impl BlobKey for i64 {
    fn key_bytes(&self) -> Vec<u8> {
        // Flip the sign bit so two's-complement ordering matches byte
        // lexicographic ordering: negative numbers sort before positive.
        (*self as u64 ^ (1u64 << 63)).to_be_bytes().to_vec()
    }
}

impl BlobKey for AccountKey {
    fn key_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

fn digitize<K: BlobKey>(k: &K) -> BytesDigits {
    BytesDigits(k.key_bytes())
}

/// Immutable map from `K` to `V`, keyed directly on `K`'s raw bytes.
#[derive(Clone)]
pub struct BlobMap<K, V> {
    root: Rc<Node<BytesDigits, K, V>>,
}

impl<K: Clone + PartialEq, V: Clone> Default for BlobMap<K, V> {
    fn default() -> Self {
        BlobMap { root: Rc::new(Node::empty()) }
    }
}

impl<K: BlobKey + Clone + PartialEq, V: Clone> BlobMap<K, V> {
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

    /// Lookup by key.
    pub fn get(&self, k: &K) -> Option<&V> {
        self.root.get(&digitize(k), k)
    }

    /// Membership test.
    pub fn contains_key(&self, k: &K) -> bool {
        self.root.contains_key(&digitize(k), k)
    }

    /// Insert or replace a binding.
    pub fn assoc(&self, k: K, v: V) -> Self {
        let d = digitize(&k);
        BlobMap { root: Rc::new(self.root.assoc(d, k, v)) }
    }

    /// Remove a binding.
    pub fn dissoc(&self, k: &K) -> Self {
        let d = digitize(k);
        match self.root.dissoc(&d, k) {
            Some(n) => BlobMap { root: Rc::new(n) },
            None => BlobMap::new(),
        }
    }

    /// All entries, sorted by key byte order (spec's "long-prefix trie"
    /// keeps numeric keys ordered, unlike [`crate::hashmap::HashMap`]).
    pub fn entries_sorted(&self) -> Vec<(K, V)> {
        let mut raw = self.root.entries();
        raw.sort_by(|a, b| a.0.cmp(&b.0));
        raw.into_iter().map(|(_, k, v)| (k, v)).collect()
    }
}

impl<K: BlobKey + Encode + Clone + PartialEq, V: Encode + Clone> Encode for BlobMap<K, V> {
    fn encode(&self, out: &mut Vec<u8>) {
        encode_node(Tag::BlobMap, &self.root, out);
    }
}

impl<K: BlobKey + Decode + Encode + Clone + PartialEq, V: Decode + Encode + Clone> Decode for BlobMap<K, V> {
    fn decode(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let (node, n) = decode_node(Tag::BlobMap, input, &digitize::<K>, 0)?;
        Ok((BlobMap { root: Rc::new(node) }, n))
    }
}
