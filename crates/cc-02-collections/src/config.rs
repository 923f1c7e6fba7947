//! Tunables named as constants rather than magic numbers, the way the
//! teacher's `ConsensusConfig`/`StateConfig` structs surface their knobs.

/// Branching factor of both the chunked vector and the radix tries: every
/// interior node splits on one hex digit (4 bits).
pub const RADIX: usize = 16;

/// Maximum elements held in a vector leaf chunk before a new chunk is
/// started.
pub const CHUNK_SIZE: usize = 16;

/// Maximum entries a map/set trie node may hold before it must be
/// represented as a flat leaf rather than a branch. A node at or under this
/// count collapses to a leaf; a node strictly above it must be a tree.
pub const LEAF_MAX: usize = 8;
