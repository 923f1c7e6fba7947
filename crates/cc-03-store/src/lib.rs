//! # Cell Store
//!
//! Content-addressed, persistent key-value map from [`shared_types::Hash`]
//! to encoded bytes. Pluggable behind the [`CellStore`]
//! trait: [`memory::MemoryStore`] for tests and an in-process peer,
//! [`disk::DiskStore`] for the append-only on-disk format.

pub mod disk;
pub mod error;
pub mod memory;

pub use error::StoreError;

use shared_types::Hash;

/// Content-addressed store: `put`, `get`, `has` over `Hash -> bytes`.
/// Concurrent `put` of the same hash is idempotent: the bytes
/// under a hash never change once written, so racing writers always agree.
pub trait CellStore {
    /// Write `bytes` under their content hash. A second `put` under the
    /// same hash with different bytes is a logic error in the caller (the
    /// hash is defined as `hash(bytes)`), not a store failure; backends may
    /// either overwrite with identical bytes or skip the write.
    fn put(&self, hash: Hash, bytes: &[u8]) -> Result<(), StoreError>;

    /// Fetch bytes previously stored under `hash`.
    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError>;

    /// `true` if `hash` is present without reading its bytes.
    fn has(&self, hash: &Hash) -> Result<bool, StoreError>;

    /// `get`, turning a miss into [`StoreError::MissingData`] rather than
    /// `Ok(None)` — the shape callers resolving a `Ref::Indirect` want.
    fn resolve(&self, hash: &Hash) -> Result<Vec<u8>, StoreError> {
        self.get(hash)?.ok_or_else(|| StoreError::MissingData(*hash))
    }
}
