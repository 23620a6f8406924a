//! Fixed-table collaborators.
//!
//! [`StaticMarket`] answers every capability from in-memory tables filled through a
//! small builder API. It backs the crate's tests and lets the demo quote against a
//! hand-written market without an RPC endpoint. Failures and latency can be injected
//! to exercise the router's error and cancellation paths.

use super::{DecimalsReader, PairResolver, PoolEnumerator, Reserves, ReserveReader, TopAssets};
use crate::errors::{ProviderError, Result};
use crate::graph::{PairKey, Pool, PoolId};
use alloy::primitives::Address;
use async_trait::async_trait;
use num_bigint::BigUint;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// An in-memory market of assets and pools.
#[derive(Debug, Default)]
pub struct StaticMarket {
    decimals: HashMap<Address, u8>,
    pools_by_pair: HashMap<PairKey, PoolId>,
    reserves: HashMap<PoolId, Reserves>,
    /// Enumeration order of `list_pools`
    pools: Vec<Pool>,
    top_assets: Vec<Address>,
    failing_pools: HashSet<PoolId>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticMarket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset and its decimal precision.
    pub fn with_asset(mut self, asset: Address, decimals: u8) -> Self {
        self.decimals.insert(asset, decimals);
        self
    }

    /// Register a pool with the reserve held for each member asset.
    ///
    /// Reserves are given per asset and stored in canonical order, so callers do not
    /// need to know which address sorts first.
    pub fn with_pool(
        mut self,
        id: PoolId,
        (asset_a, reserve_a): (Address, impl Into<BigUint>),
        (asset_b, reserve_b): (Address, impl Into<BigUint>),
    ) -> Self {
        let key = PairKey::new(asset_a, asset_b);
        let (reserve_a, reserve_b) = (reserve_a.into(), reserve_b.into());
        let reserves = if key.is_first(&asset_a) {
            Reserves::new(reserve_a, reserve_b)
        } else {
            Reserves::new(reserve_b, reserve_a)
        };

        // Only distinct assets are meaningful; a degenerate pool is silently ignored.
        if let Ok(pool) = Pool::new(id, asset_a, asset_b) {
            self.pools.retain(|existing| existing.pair_key() != key);
            self.pools.push(pool);
            self.pools_by_pair.insert(key, id);
            self.reserves.insert(id, reserves);
        }
        self
    }

    /// Register a pool that resolves but is left out of `list_pools`.
    ///
    /// Models a pair that exists on-chain but is filtered out by the liquidity policy.
    pub fn with_unlisted_pool(
        self,
        id: PoolId,
        side_a: (Address, impl Into<BigUint>),
        side_b: (Address, impl Into<BigUint>),
    ) -> Self {
        let mut market = self.with_pool(id, side_a, side_b);
        market.pools.retain(|pool| pool.id() != id);
        market
    }

    /// Set the curated top-asset list.
    pub fn with_top_assets(mut self, assets: impl IntoIterator<Item = Address>) -> Self {
        self.top_assets = assets.into_iter().collect();
        self
    }

    /// Make every reserve read for `pool` fail with an RPC error.
    pub fn with_failing_pool(mut self, pool: PoolId) -> Self {
        self.failing_pools.insert(pool);
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total number of collaborator calls answered so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl PairResolver for StaticMarket {
    async fn resolve_pool(&self, asset_a: Address, asset_b: Address) -> Result<PoolId> {
        self.record_call().await;
        self.pools_by_pair
            .get(&PairKey::new(asset_a, asset_b))
            .copied()
            .ok_or_else(|| ProviderError::PairNotFound { asset_a, asset_b }.into())
    }
}

#[async_trait]
impl ReserveReader for StaticMarket {
    async fn read_reserves(&self, pool: PoolId) -> Result<Reserves> {
        self.record_call().await;
        if self.failing_pools.contains(&pool) {
            return Err(ProviderError::Rpc {
                method: "getReserves",
                target: pool,
                message: "injected failure".to_string(),
            }
            .into());
        }
        self.reserves
            .get(&pool)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownPool { pool }.into())
    }
}

#[async_trait]
impl DecimalsReader for StaticMarket {
    async fn read_decimals(&self, asset: Address) -> Result<u8> {
        self.record_call().await;
        self.decimals
            .get(&asset)
            .copied()
            .ok_or_else(|| ProviderError::UnknownAsset { asset }.into())
    }
}

#[async_trait]
impl TopAssets for StaticMarket {
    async fn list_top_assets(&self) -> Result<Vec<Address>> {
        self.record_call().await;
        Ok(self.top_assets.clone())
    }
}

#[async_trait]
impl PoolEnumerator for StaticMarket {
    async fn list_pools(&self) -> Result<Vec<Pool>> {
        self.record_call().await;
        Ok(self.pools.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    #[tokio::test]
    async fn test_reserves_stored_in_canonical_order() {
        let pool_id = Address::repeat_byte(0xaa);
        let market = StaticMarket::new().with_pool(pool_id, (asset(9), 900u32), (asset(1), 100u32));

        let reserves = market.read_reserves(pool_id).await.unwrap();
        assert_eq!(reserves, Reserves::new(100u32, 900u32));
    }

    #[tokio::test]
    async fn test_resolve_pool_is_symmetric() {
        let pool_id = Address::repeat_byte(0xaa);
        let market = StaticMarket::new().with_pool(pool_id, (asset(1), 1u32), (asset(2), 1u32));

        assert_eq!(market.resolve_pool(asset(1), asset(2)).await.unwrap(), pool_id);
        assert_eq!(market.resolve_pool(asset(2), asset(1)).await.unwrap(), pool_id);

        let missing = market.resolve_pool(asset(1), asset(3)).await.unwrap_err();
        assert!(missing.is_pair_not_found());
    }

    #[tokio::test]
    async fn test_unlisted_pool_resolves_but_is_not_enumerated() {
        let market = StaticMarket::new()
            .with_pool(Address::repeat_byte(0xa1), (asset(1), 1u32), (asset(2), 1u32))
            .with_unlisted_pool(Address::repeat_byte(0xa2), (asset(2), 1u32), (asset(3), 1u32));

        let pools = market.list_pools().await.unwrap();
        assert_eq!(pools.len(), 1);
        assert!(market.resolve_pool(asset(3), asset(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_failures_and_unknowns() {
        let pool_id = Address::repeat_byte(0xaa);
        let market = StaticMarket::new()
            .with_asset(asset(1), 6)
            .with_pool(pool_id, (asset(1), 1u32), (asset(2), 1u32))
            .with_failing_pool(pool_id);

        assert!(market.read_reserves(pool_id).await.is_err());
        assert!(market.read_reserves(Address::repeat_byte(0xbb)).await.is_err());
        assert_eq!(market.read_decimals(asset(1)).await.unwrap(), 6);
        assert!(market.read_decimals(asset(2)).await.is_err());
        assert_eq!(market.call_count(), 4);
    }
}
