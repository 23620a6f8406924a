//! External collaborators consumed by the routing engine.
//!
//! The engine never talks to a ledger directly. It sees the outside world through five
//! narrow, object-safe capabilities:
//!
//! - **[`PairResolver`]**: asset pair -> pool identifier
//! - **[`ReserveReader`]**: pool identifier -> raw reserves, in ascending asset order
//! - **[`DecimalsReader`]**: asset -> native decimal precision
//! - **[`TopAssets`]**: the curated list of high-liquidity assets
//! - **[`PoolEnumerator`]**: candidate pools, already filtered by a liquidity policy
//!
//! # Implementations
//!
//! - **`onchain`**: Uniswap-V2-style factory, pair and ERC-20 contracts over JSON-RPC
//! - **`pools`**: a static top-asset list and a pool enumerator built on top of it
//! - **`memory`**: fixed in-memory tables, for tests and offline demos
//!
//! Implementations must be safe to share between tasks; the router holds them behind
//! `Arc<dyn Trait>` and may call them concurrently while populating its reserve cache.

pub mod memory;
pub mod onchain;
pub mod pools;

pub use memory::StaticMarket;
pub use onchain::{OnChainDecimalsReader, OnChainPairResolver, OnChainReserveReader, RpcCaller};
pub use pools::{StaticTopAssets, TopAssetPools};

use crate::errors::Result;
use crate::graph::{PairKey, Pool, PoolId};
use alloy::primitives::Address;
use async_trait::async_trait;
use num_bigint::BigUint;
use std::sync::Arc;

/// Resolves an asset pair to the pool trading it.
#[async_trait]
pub trait PairResolver: Send + Sync {
    /// Fails with `ProviderError::PairNotFound` when no pool exists for the pair.
    async fn resolve_pool(&self, asset_a: Address, asset_b: Address) -> Result<PoolId>;
}

/// Reads a pool's current reserves.
#[async_trait]
pub trait ReserveReader: Send + Sync {
    /// Reserves are ordered by ascending asset identifier.
    async fn read_reserves(&self, pool: PoolId) -> Result<Reserves>;
}

/// Reads an asset's native decimal precision.
#[async_trait]
pub trait DecimalsReader: Send + Sync {
    async fn read_decimals(&self, asset: Address) -> Result<u8>;
}

/// Curated list of widely traded assets.
#[async_trait]
pub trait TopAssets: Send + Sync {
    async fn list_top_assets(&self) -> Result<Vec<Address>>;
}

/// Enumerates candidate pools for routing.
///
/// Whatever minimum-liquidity policy applies is enforced here, never by the router.
#[async_trait]
pub trait PoolEnumerator: Send + Sync {
    async fn list_pools(&self) -> Result<Vec<Pool>>;
}

/// Raw pool balances in canonical order.
///
/// `reserve0` belongs to the asset with the smaller identifier, `reserve1` to the
/// larger one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reserves {
    pub reserve0: BigUint,
    pub reserve1: BigUint,
}

impl Reserves {
    pub fn new(reserve0: impl Into<BigUint>, reserve1: impl Into<BigUint>) -> Self {
        Self {
            reserve0: reserve0.into(),
            reserve1: reserve1.into(),
        }
    }

    /// Orient the pair for a conversion starting from `asset_in`.
    ///
    /// Returns `(reserve_in, reserve_out)`. `key` must be the pair these reserves were
    /// read for.
    pub fn oriented(&self, key: &PairKey, asset_in: &Address) -> (&BigUint, &BigUint) {
        if key.is_first(asset_in) {
            (&self.reserve0, &self.reserve1)
        } else {
            (&self.reserve1, &self.reserve0)
        }
    }
}

/// The collaborator set a [`Router`](crate::router::Router) is wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub pairs: Arc<dyn PairResolver>,
    pub reserves: Arc<dyn ReserveReader>,
    pub decimals: Arc<dyn DecimalsReader>,
    pub pools: Arc<dyn PoolEnumerator>,
}

impl Collaborators {
    /// Use one value that implements every capability, such as [`StaticMarket`].
    pub fn from_shared<T>(source: Arc<T>) -> Self
    where
        T: PairResolver + ReserveReader + DecimalsReader + PoolEnumerator + 'static,
    {
        Self {
            pairs: source.clone(),
            reserves: source.clone(),
            decimals: source.clone(),
            pools: source,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserves_oriented_follows_pair_key() {
        let low = Address::with_last_byte(1);
        let high = Address::with_last_byte(2);
        let key = PairKey::new(high, low);
        let reserves = Reserves::new(100u32, 200u32);

        let (r_in, r_out) = reserves.oriented(&key, &low);
        assert_eq!((r_in, r_out), (&BigUint::from(100u32), &BigUint::from(200u32)));

        let (r_in, r_out) = reserves.oriented(&key, &high);
        assert_eq!((r_in, r_out), (&BigUint::from(200u32), &BigUint::from(100u32)));
    }
}
