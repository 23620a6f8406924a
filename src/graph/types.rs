//! Core types for the asset graph.
//!
//! - Type aliases for identifiers
//! - Pool representation
//! - The canonical, order-independent key for an asset pair

use crate::errors::{GraphError, Result};
use alloy::primitives::Address;
use std::fmt;

/// Position of an asset in the graph; doubles as the DP column index
pub type AssetIndex = usize;

/// Opaque on-chain identifier of a liquidity pool
pub type PoolId = Address;

/// A bilateral liquidity pool between two distinct assets.
///
/// The member order is whatever the enumerator reported; it carries no meaning.
/// Reserve ordering is always derived from [`PairKey`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pool {
    id: PoolId,
    assets: [Address; 2],
}

impl Pool {
    /// Create a pool, rejecting a pool whose two members are the same asset.
    pub fn new(id: PoolId, asset_a: Address, asset_b: Address) -> Result<Self> {
        if asset_a == asset_b {
            return Err(GraphError::DegeneratePool { pool: id, asset: asset_a }.into());
        }
        Ok(Self { id, assets: [asset_a, asset_b] })
    }

    /// Get the pool identifier
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Get both member assets
    pub fn assets(&self) -> [Address; 2] {
        self.assets
    }

    /// The canonical key of this pool's pair
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.assets[0], self.assets[1])
    }

    /// Whether `asset` is one of the two members
    pub fn contains(&self, asset: &Address) -> bool {
        self.assets.contains(asset)
    }
}

/// Two asset identifiers in ascending order.
///
/// Pair contracts report reserves in this same order (the smaller address's reserve
/// first), so a key also tells which reported reserve belongs to which asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey([Address; 2]);

impl PairKey {
    /// Build the key for `a` and `b` in either order
    pub fn new(a: Address, b: Address) -> Self {
        if a <= b {
            Self([a, b])
        } else {
            Self([b, a])
        }
    }

    /// The asset with the smaller identifier (owner of `reserve0`)
    pub fn first(&self) -> Address {
        self.0[0]
    }

    /// The asset with the larger identifier (owner of `reserve1`)
    pub fn second(&self) -> Address {
        self.0[1]
    }

    /// Whether `asset` owns the first reported reserve
    pub fn is_first(&self, asset: &Address) -> bool {
        &self.0[0] == asset
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}
