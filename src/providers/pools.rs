//! Top-asset pool discovery.
//!
//! [`TopAssetPools`] is the crate's liquidity policy: it pairs every curated top asset
//! with every other one, resolves the pool trading each pair and keeps the pools deep
//! enough on both sides.

use super::{DecimalsReader, PairResolver, PoolEnumerator, ReserveReader, TopAssets};
use crate::errors::Result;
use crate::graph::{PairKey, Pool};
use crate::pricing::{normalize, NORMALIZED_DECIMALS};
use alloy::primitives::Address;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use itertools::Itertools;
use num_bigint::BigUint;
use std::sync::Arc;

/// A fixed, caller-supplied list of top assets.
#[derive(Debug, Clone, Default)]
pub struct StaticTopAssets(Vec<Address>);

impl StaticTopAssets {
    pub fn new(assets: Vec<Address>) -> Self {
        Self(assets)
    }
}

#[async_trait]
impl TopAssets for StaticTopAssets {
    async fn list_top_assets(&self) -> Result<Vec<Address>> {
        Ok(self.0.clone())
    }
}

/// Enumerates pools between top assets, filtered by minimum liquidity.
#[derive(Clone)]
pub struct TopAssetPools {
    top_assets: Arc<dyn TopAssets>,
    pairs: Arc<dyn PairResolver>,
    reserves: Arc<dyn ReserveReader>,
    decimals: Arc<dyn DecimalsReader>,
    /// Whole units required on each side of a pool
    min_liquidity: u64,
    max_concurrency: usize,
}

impl TopAssetPools {
    pub fn new(
        top_assets: Arc<dyn TopAssets>,
        pairs: Arc<dyn PairResolver>,
        reserves: Arc<dyn ReserveReader>,
        decimals: Arc<dyn DecimalsReader>,
    ) -> Self {
        Self {
            top_assets,
            pairs,
            reserves,
            decimals,
            min_liquidity: 0,
            max_concurrency: 8,
        }
    }

    /// Require at least `units` whole units of each asset in a pool.
    pub fn with_min_liquidity(mut self, units: u64) -> Self {
        self.min_liquidity = units;
        self
    }

    /// Bound the number of in-flight lookups.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Resolve one pair, returning `None` when it has no pool or is too shallow.
    async fn inspect(&self, key: PairKey) -> Result<Option<Pool>> {
        let pool_id = match self.pairs.resolve_pool(key.first(), key.second()).await {
            Ok(pool_id) => pool_id,
            Err(e) if e.is_pair_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        if self.min_liquidity > 0 {
            let reserves = self.reserves.read_reserves(pool_id).await?;
            let decimals0 = self.decimals.read_decimals(key.first()).await?;
            let decimals1 = self.decimals.read_decimals(key.second()).await?;

            let threshold = BigUint::from(self.min_liquidity)
                * BigUint::from(10u32).pow(u32::from(NORMALIZED_DECIMALS));
            let deep_enough = normalize(&reserves.reserve0, decimals0)? >= threshold
                && normalize(&reserves.reserve1, decimals1)? >= threshold;

            if !deep_enough {
                tracing::debug!(
                    pool = %pool_id,
                    min_liquidity = self.min_liquidity,
                    "Pool below liquidity threshold, skipping"
                );
                return Ok(None);
            }
        }

        Ok(Some(Pool::new(pool_id, key.first(), key.second())?))
    }
}

#[async_trait]
impl PoolEnumerator for TopAssetPools {
    async fn list_pools(&self) -> Result<Vec<Pool>> {
        let assets = self.top_assets.list_top_assets().await?;
        let keys: Vec<PairKey> = assets
            .into_iter()
            .unique()
            .tuple_combinations()
            .map(|(a, b)| PairKey::new(a, b))
            .collect();
        let candidates = keys.len();

        // `buffered` keeps enumeration order stable across runs
        let inspected: Vec<Option<Pool>> = stream::iter(keys)
            .map(|key| self.inspect(key))
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;
        let pools: Vec<Pool> = inspected.into_iter().flatten().collect();

        tracing::info!(
            candidates,
            pools = pools.len(),
            min_liquidity = self.min_liquidity,
            "Enumerated top-asset pools"
        );
        Ok(pools)
    }
}

impl std::fmt::Debug for TopAssetPools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopAssetPools")
            .field("min_liquidity", &self.min_liquidity)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}
