//! Core asset graph implementation.
//!
//! The graph is the node set of one route computation: every asset that appears in a
//! candidate pool, in first-seen order, followed by the source and destination when
//! no pool mentions them. Node positions are stable for the lifetime of the graph and
//! index the router's DP table directly.

use super::types::{AssetIndex, Pool};
use crate::errors::{GraphError, Result};
use alloy::primitives::Address;
use itertools::Itertools;
use std::collections::HashMap;

/// The unique assets a route search runs over.
#[derive(Debug, Clone, Default)]
pub struct AssetGraph {
    /// Assets in insertion order
    assets: Vec<Address>,
    /// Mapping from asset address to its index for fast lookup
    asset_to_index: HashMap<Address, AssetIndex>,
    /// Number of candidate pools the graph was built from
    pool_count: usize,
}

impl AssetGraph {
    /// Create a new empty asset graph
    pub fn new() -> Self {
        Self::default()
    }

    // ================================
    // Construction Methods
    // ================================

    /// Build the node set for a search from `source` to `destination`.
    ///
    /// Assets from `pools` come first in the order they are first seen; `source` and
    /// `destination` are appended only when no pool mentions them.
    pub fn from_pools(pools: &[Pool], source: Address, destination: Address) -> Self {
        let mut graph = Self::new();
        pools
            .iter()
            .flat_map(Pool::assets)
            .chain([source, destination])
            .unique()
            .for_each(|asset| {
                graph.add_asset(asset);
            });
        graph.pool_count = pools.len();

        tracing::debug!(
            source = %source,
            destination = %destination,
            candidate_pools = pools.len(),
            asset_count = graph.len(),
            "Asset graph built"
        );

        graph
    }

    /// Add an asset to the graph.
    ///
    /// If the asset is already present, returns its existing index.
    pub fn add_asset(&mut self, address: Address) -> AssetIndex {
        if let Some(&existing) = self.asset_to_index.get(&address) {
            return existing;
        }

        let index = self.assets.len();
        self.assets.push(address);
        self.asset_to_index.insert(address, index);
        index
    }

    // ================================
    // Query Methods
    // ================================

    /// Number of assets in the graph
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the graph has no assets
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Number of candidate pools the graph was built from
    pub fn pool_count(&self) -> usize {
        self.pool_count
    }

    /// All assets in index order
    pub fn assets(&self) -> &[Address] {
        &self.assets
    }

    /// Find the index of an asset
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is not part of the graph
    pub fn index_of(&self, address: &Address) -> Result<AssetIndex> {
        self.asset_to_index
            .get(address)
            .copied()
            .ok_or_else(|| GraphError::AssetNotFound { address: *address }.into())
    }

    /// Get the asset at `index`
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range
    pub fn asset(&self, index: AssetIndex) -> Result<Address> {
        self.assets
            .get(index)
            .copied()
            .ok_or_else(|| GraphError::InvalidAssetIndex { index }.into())
    }

    /// Every unordered pair of distinct asset indices, `(i, j)` with `i < j`
    pub fn index_pairs(&self) -> impl Iterator<Item = (AssetIndex, AssetIndex)> + '_ {
        (0..self.len()).tuple_combinations()
    }
}
