//! Best-rate routing across constant-reserve pools.
//!
//! [`Router`] answers two questions:
//!
//! - **`quote_direct`**: the marginal rate of the single pool trading a pair
//! - **`route`**: the best marginal rate from one asset to another using up to five
//!   conversions, together with the assets the route passes through
//!
//! A multi-hop search enumerates the candidate pools, builds the asset graph over
//! them, snapshots every reserve it could need into a [`ReserveCache`] and then fills
//! a [`HopTable`] level by level. All collaborator traffic happens before the table is
//! filled; the DP itself is pure.
//!
//! Rates are marginal (see [`crate::pricing`]), so a route's rate is the product of
//! its hops' reserve ratios and does not account for fees or trade size.

pub mod cache;
pub mod table;

pub use cache::ReserveCache;
pub use table::{Edge, HopTable};

use crate::builders::AssetGraphBuilder;
use crate::context::QuoteContext;
use crate::errors::{Result, RouteError};
use crate::graph::PairKey;
use crate::pricing::price;
use crate::providers::Collaborators;
use crate::utils::format_rate;
use alloy::primitives::Address;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

/// Largest supported number of conversions in one route
pub const MAX_HOPS: usize = 5;

/// The best rate found and the assets it passes through, source first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    pub rate: BigRational,
    pub path: Vec<Address>,
}

impl RouteResult {
    /// Number of conversions along the path
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Display form with the rate rendered to `precision` fractional digits.
    pub fn summary(&self, precision: usize) -> RouteSummary {
        RouteSummary {
            rate: format_rate(&self.rate, precision),
            hops: self.hops(),
            path: self.path.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Serializable rendering of a [`RouteResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub rate: String,
    pub hops: usize,
    pub path: Vec<String>,
}

/// Multi-hop router over a fixed set of collaborators.
#[derive(Debug, Clone)]
pub struct Router {
    collaborators: Collaborators,
    max_concurrency: usize,
}

impl Router {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            max_concurrency: 8,
        }
    }

    /// Bound the number of collaborator calls in flight during cache population.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Marginal rate of converting `asset_a` into `asset_b` through their direct pool.
    ///
    /// # Errors
    ///
    /// - [`RouteError::SameAsset`] when both assets are equal, before any lookup
    /// - any collaborator error, unchanged, including `PairNotFound`
    /// - [`PricingError::DivisionByZero`](crate::errors::PricingError::DivisionByZero)
    ///   when the pool holds none of `asset_a`
    pub async fn quote_direct(
        &self,
        ctx: &QuoteContext,
        asset_a: Address,
        asset_b: Address,
    ) -> Result<BigRational> {
        if asset_a == asset_b {
            return Err(RouteError::SameAsset { asset: asset_a }.into());
        }

        let collaborators = &self.collaborators;
        let pool = ctx.run(collaborators.pairs.resolve_pool(asset_a, asset_b)).await?;
        let reserves = ctx.run(collaborators.reserves.read_reserves(pool)).await?;
        let decimals_a = ctx.run(collaborators.decimals.read_decimals(asset_a)).await?;
        let decimals_b = ctx.run(collaborators.decimals.read_decimals(asset_b)).await?;

        let key = PairKey::new(asset_a, asset_b);
        let (reserve_in, reserve_out) = reserves.oriented(&key, &asset_a);
        let rate = price(reserve_in, reserve_out, decimals_a, decimals_b)?;

        tracing::debug!(
            asset_in = %asset_a,
            asset_out = %asset_b,
            pool = %pool,
            rate = %rate,
            "Direct quote computed"
        );

        Ok(rate)
    }

    /// Best rate from `source` to `destination` using at most `max_hops` conversions.
    ///
    /// With `max_hops == 1` this is exactly [`quote_direct`](Self::quote_direct). With
    /// more hops the search runs over the pools reported by the pool enumerator; it
    /// stops early once a level fails to improve the destination.
    ///
    /// # Errors
    ///
    /// - [`RouteError::SameAsset`] and [`RouteError::InvalidHopCount`], checked in
    ///   that order before any collaborator call
    /// - [`RouteError::Unreachable`] when no route exists within `max_hops`
    /// - any collaborator error other than `PairNotFound` during cache population,
    ///   including cancellation and deadline expiry
    pub async fn route(
        &self,
        ctx: &QuoteContext,
        source: Address,
        destination: Address,
        max_hops: usize,
    ) -> Result<RouteResult> {
        if source == destination {
            return Err(RouteError::SameAsset { asset: source }.into());
        }
        if max_hops == 0 || max_hops > MAX_HOPS {
            return Err(RouteError::InvalidHopCount {
                requested: max_hops,
                max: MAX_HOPS,
            }
            .into());
        }

        let span = tracing::info_span!(
            "route",
            id = %Uuid::new_v4(),
            source = %source,
            destination = %destination,
            max_hops
        );

        async move {
            if max_hops == 1 {
                let rate = self.quote_direct(ctx, source, destination).await?;
                return Ok(RouteResult {
                    rate,
                    path: vec![source, destination],
                });
            }

            let result = self.search(ctx, source, destination, max_hops).await;
            match &result {
                Ok(route) => tracing::info!(
                    rate = %route.rate,
                    hops = route.hops(),
                    "Route found"
                ),
                Err(e) => tracing::warn!(error = %e, "Route search failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn search(
        &self,
        ctx: &QuoteContext,
        source: Address,
        destination: Address,
        max_hops: usize,
    ) -> Result<RouteResult> {
        let pools = ctx.run(self.collaborators.pools.list_pools()).await?;

        let graph = AssetGraphBuilder::new()
            .add_pools(pools)
            .source(source)
            .destination(destination)
            .build()?;
        let source_index = graph.index_of(&source)?;
        let destination_index = graph.index_of(&destination)?;

        let cache = ReserveCache::populate(&graph, &self.collaborators, ctx, self.max_concurrency).await?;
        let edges = cache.edges(&graph)?;

        let table = HopTable::solve(graph.len(), source_index, destination_index, max_hops, &edges);
        tracing::debug!(
            asset_count = graph.len(),
            edge_count = edges.len(),
            levels = table.depth() - 1,
            best_level = table.best_level(),
            "Hop table filled"
        );

        let (rate, indices) = table.best_route().ok_or(RouteError::Unreachable {
            source_asset: source,
            destination,
            max_hops,
        })?;
        let path = indices
            .into_iter()
            .map(|index| graph.asset(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(RouteResult { rate, path })
    }
}
