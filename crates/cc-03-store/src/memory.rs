//! In-memory [`CellStore`] backend: a lock-guarded hash map standing in for
//! a real backend, used in tests and for a peer with no durability
//! requirement.

use std::collections::HashMap as StdHashMap;

use parking_lot::RwLock;
use shared_types::Hash;

use crate::{CellStore, StoreError};

/// `CellStore` backed by a lock-guarded in-process hash map. Multi-reader,
/// single-writer-per-hash: concurrent `put` of the same hash is
/// idempotent since the value is immutably keyed by its own content hash.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StdHashMap<Hash, Vec<u8>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct cells stored.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// `true` if no cells are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CellStore for MemoryStore {
    fn put(&self, hash: Hash, bytes: &[u8]) -> Result<(), StoreError> {
        self.inner.write().entry(hash).or_insert_with(|| bytes.to_vec());
        Ok(())
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.read().get(hash).cloned())
    }

    fn has(&self, hash: &Hash) -> Result<bool, StoreError> {
        Ok(self.inner.read().contains_key(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let store = MemoryStore::new();
        let hash = Hash::from_bytes([1u8; 32]);
        store.put(hash, b"hello").unwrap();
        assert_eq!(store.get(&hash).unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        let hash = Hash::from_bytes([2u8; 32]);
        assert_eq!(store.get(&hash).unwrap(), None);
        assert!(!store.has(&hash).unwrap());
    }

    #[test]
    fn resolve_missing_is_missing_data_error() {
        let store = MemoryStore::new();
        let hash = Hash::from_bytes([3u8; 32]);
        assert!(matches!(store.resolve(&hash), Err(StoreError::MissingData(h)) if h == hash));
    }

    #[test]
    fn repeated_put_of_same_hash_is_idempotent() {
        let store = MemoryStore::new();
        let hash = Hash::from_bytes([4u8; 32]);
        store.put(hash, b"x").unwrap();
        store.put(hash, b"x").unwrap();
        assert_eq!(store.len(), 1);
    }
}
