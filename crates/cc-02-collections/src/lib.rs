//! # Persistent Collections
//!
//! Immutable, structurally-shared collections over the canonical cell
//! encoding (`cc-01-encoding`): [`vector::Vector`] (chunked tree),
//! [`hashmap::HashMap`]/[`hashset::HashSet`] (16-way radix trie over a
//! key's hash) and [`blobmap::BlobMap`] (the same trie shape keyed on a
//! key's raw bytes, so numeric keys stay ordered).
//!
//! These are the data structures `Order.blocks`, `Belief.orders`,
//! `State.accounts`/`peers`/`schedule` and `Peer.stateHistory` are built
//! from. `trie` holds the radix-trie machinery shared by the map,
//! set and blob-map.

pub mod blobmap;
pub mod config;
pub mod hashmap;
pub mod hashset;
pub mod trie;
pub mod vector;

pub use blobmap::{BlobKey, BlobMap};
pub use config::{CHUNK_SIZE, LEAF_MAX, RADIX};
pub use hashmap::HashMap;
pub use hashset::HashSet;
pub use vector::Vector;
