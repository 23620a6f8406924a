//! Asset graph for multi-hop route search.
//!
//! Nodes are assets; an edge exists between two assets whenever the reserve cache
//! holds reserves for their pair. This module owns the node set and the pool and
//! pair-key types shared with the rest of the crate.

pub mod core;
pub mod types;

// Re-export all public types for convenience
pub use self::core::AssetGraph;
pub use types::{AssetIndex, PairKey, Pool, PoolId};
