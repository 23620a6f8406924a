//! Per-computation reserve and decimals snapshot.
//!
//! The cache is filled once, before the DP starts, and is read-only afterwards. Every
//! unordered asset pair is resolved exactly once; pairs without a pool become absent
//! edges. Any other collaborator failure aborts population.

use super::table::Edge;
use crate::context::QuoteContext;
use crate::errors::{PricingError, Result};
use crate::graph::{AssetGraph, AssetIndex, PairKey};
use crate::pricing::price;
use crate::providers::{Collaborators, Reserves};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;

enum Lookup {
    Decimals(AssetIndex),
    Pair(AssetIndex, AssetIndex),
}

enum Fetched {
    Decimals(AssetIndex, u8),
    Pair(PairKey, Option<Reserves>),
}

/// Reserves of every pooled pair and decimals of every asset in one graph.
#[derive(Debug, Clone, Default)]
pub struct ReserveCache {
    reserves: HashMap<PairKey, Reserves>,
    decimals: Vec<u8>,
}

impl ReserveCache {
    /// Fetch everything a search over `graph` needs, with at most `max_concurrency`
    /// collaborator calls in flight.
    pub async fn populate(
        graph: &AssetGraph,
        collaborators: &Collaborators,
        ctx: &QuoteContext,
        max_concurrency: usize,
    ) -> Result<Self> {
        ctx.check()?;

        let lookups: Vec<Lookup> = (0..graph.len())
            .map(Lookup::Decimals)
            .chain(graph.index_pairs().map(|(i, j)| Lookup::Pair(i, j)))
            .collect();
        let lookup_count = lookups.len();

        let fetched: Vec<Fetched> = stream::iter(lookups)
            .map(|lookup| Self::fetch(graph, collaborators, ctx, lookup))
            .buffer_unordered(max_concurrency.max(1))
            .try_collect()
            .await?;

        let mut cache = Self {
            reserves: HashMap::new(),
            decimals: vec![0; graph.len()],
        };
        for item in fetched {
            match item {
                Fetched::Decimals(index, decimals) => cache.decimals[index] = decimals,
                Fetched::Pair(key, Some(reserves)) => {
                    cache.reserves.insert(key, reserves);
                }
                Fetched::Pair(_, None) => {}
            }
        }

        tracing::debug!(
            asset_count = graph.len(),
            lookups = lookup_count,
            pooled_pairs = cache.reserves.len(),
            "Reserve cache populated"
        );

        Ok(cache)
    }

    async fn fetch(
        graph: &AssetGraph,
        collaborators: &Collaborators,
        ctx: &QuoteContext,
        lookup: Lookup,
    ) -> Result<Fetched> {
        match lookup {
            Lookup::Decimals(index) => {
                let asset = graph.asset(index)?;
                let decimals = ctx.run(collaborators.decimals.read_decimals(asset)).await?;
                Ok(Fetched::Decimals(index, decimals))
            }
            Lookup::Pair(i, j) => {
                let key = PairKey::new(graph.asset(i)?, graph.asset(j)?);
                let pool = match ctx.run(collaborators.pairs.resolve_pool(key.first(), key.second())).await {
                    Ok(pool) => pool,
                    Err(e) if e.is_pair_not_found() => return Ok(Fetched::Pair(key, None)),
                    Err(e) => return Err(e),
                };
                let reserves = ctx.run(collaborators.reserves.read_reserves(pool)).await?;
                Ok(Fetched::Pair(key, Some(reserves)))
            }
        }
    }

    /// Cached reserves for a pair, in canonical order
    pub fn reserves(&self, key: &PairKey) -> Option<&Reserves> {
        self.reserves.get(key)
    }

    /// Cached decimals for the asset at `index`
    pub fn decimals(&self, index: AssetIndex) -> Option<u8> {
        self.decimals.get(index).copied()
    }

    /// Number of pairs with a pool
    pub fn pooled_pairs(&self) -> usize {
        self.reserves.len()
    }

    /// Every viable directed conversion, in ascending `(from, to)` index order.
    ///
    /// Pairs without a pool and directions whose input reserve is zero are left out.
    pub fn edges(&self, graph: &AssetGraph) -> Result<Vec<Edge>> {
        let mut edges = Vec::with_capacity(self.reserves.len() * 2);

        for from in 0..graph.len() {
            let asset_in = graph.asset(from)?;
            for to in (0..graph.len()).filter(|&to| to != from) {
                let key = PairKey::new(asset_in, graph.asset(to)?);
                let Some(reserves) = self.reserves.get(&key) else {
                    continue;
                };

                let (reserve_in, reserve_out) = reserves.oriented(&key, &asset_in);
                match price(reserve_in, reserve_out, self.decimals[from], self.decimals[to]) {
                    Ok(rate) => edges.push(Edge { from, to, rate }),
                    Err(PricingError::DivisionByZero) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Pool;
    use crate::providers::StaticMarket;
    use alloy::primitives::Address;
    use num_bigint::{BigInt, BigUint};
    use num_rational::BigRational;
    use std::sync::Arc;

    fn asset(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    fn graph_of(assets: &[Address]) -> AssetGraph {
        let mut graph = AssetGraph::new();
        for a in assets {
            graph.add_asset(*a);
        }
        graph
    }

    #[tokio::test]
    async fn test_populate_resolves_each_pair_once() {
        let market = Arc::new(
            StaticMarket::new()
                .with_asset(asset(1), 18)
                .with_asset(asset(2), 18)
                .with_asset(asset(3), 18)
                .with_pool(Address::repeat_byte(0xa1), (asset(1), 100u32), (asset(2), 200u32)),
        );
        let collaborators = Collaborators::from_shared(market.clone());
        let graph = graph_of(&[asset(1), asset(2), asset(3)]);

        let cache = ReserveCache::populate(&graph, &collaborators, &QuoteContext::new(), 4)
            .await
            .unwrap();

        // 3 decimals reads, 3 pair resolutions, 1 reserve read
        assert_eq!(market.call_count(), 7);
        assert_eq!(cache.pooled_pairs(), 1);
        assert_eq!(
            cache.reserves(&PairKey::new(asset(2), asset(1))),
            Some(&Reserves::new(100u32, 200u32))
        );
        assert_eq!(cache.decimals(2), Some(18));
    }

    #[tokio::test]
    async fn test_populate_fails_on_reader_error() {
        let market = Arc::new(
            StaticMarket::new()
                .with_asset(asset(1), 18)
                .with_asset(asset(2), 18)
                .with_pool(Address::repeat_byte(0xa1), (asset(1), 100u32), (asset(2), 200u32))
                .with_failing_pool(Address::repeat_byte(0xa1)),
        );
        let collaborators = Collaborators::from_shared(market);
        let graph = graph_of(&[asset(1), asset(2)]);

        let result = ReserveCache::populate(&graph, &collaborators, &QuoteContext::new(), 4).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_edges_are_oriented_and_skip_empty_reserves() {
        let market = Arc::new(
            StaticMarket::new()
                .with_asset(asset(1), 18)
                .with_asset(asset(2), 6)
                .with_asset(asset(3), 18)
                .with_pool(
                    Address::repeat_byte(0xa1),
                    (asset(1), BigUint::from(10u32).pow(18)),
                    (asset(2), 2_000_000u32),
                )
                .with_pool(Address::repeat_byte(0xa2), (asset(2), 0u32), (asset(3), 5u32)),
        );
        let collaborators = Collaborators::from_shared(market);
        let pools = vec![
            Pool::new(Address::repeat_byte(0xa1), asset(1), asset(2)).unwrap(),
            Pool::new(Address::repeat_byte(0xa2), asset(2), asset(3)).unwrap(),
        ];
        let graph = AssetGraph::from_pools(&pools, asset(1), asset(3));

        let cache = ReserveCache::populate(&graph, &collaborators, &QuoteContext::new(), 2)
            .await
            .unwrap();
        let edges = cache.edges(&graph).unwrap();

        let two = BigRational::from_integer(BigInt::from(2));
        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        assert_eq!(edges[0], Edge { from: 0, to: 1, rate: two });
        assert_eq!(edges[1], Edge { from: 1, to: 0, rate: half });
        // 2 -> 3 has an empty input reserve; 3 -> 2 is a zero rate
        assert_eq!(edges.len(), 3);
        assert_eq!((edges[2].from, edges[2].to), (2, 1));
    }
}
