//! Builder pattern for AssetGraph

use crate::errors::{GraphError, Result};
use crate::graph::{AssetGraph, Pool};
use alloy::primitives::Address;

/// Builder for creating AssetGraph instances with a fluent API
#[derive(Debug, Clone, Default)]
pub struct AssetGraphBuilder {
    pools: Vec<Pool>,
    source: Option<Address>,
    destination: Option<Address>,
}

impl AssetGraphBuilder {
    /// Create a new AssetGraphBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate pool
    pub fn add_pool(mut self, pool: Pool) -> Self {
        self.pools.push(pool);
        self
    }

    /// Add multiple candidate pools, keeping their order
    ///
    /// # Arguments
    ///
    /// * `pools` - Iterator of pools as reported by the pool enumerator
    pub fn add_pools<I>(mut self, pools: I) -> Self
    where
        I: IntoIterator<Item = Pool>,
    {
        self.pools.extend(pools);
        self
    }

    /// Set the asset the search starts from
    pub fn source(mut self, source: Address) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the asset the search ends at
    pub fn destination(mut self, destination: Address) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Build the AssetGraph
    ///
    /// # Errors
    ///
    /// Returns an error if the source or destination was never set
    pub fn build(self) -> Result<AssetGraph> {
        let source = self.source.ok_or(GraphError::MissingEndpoint { role: "source" })?;
        let destination = self
            .destination
            .ok_or(GraphError::MissingEndpoint { role: "destination" })?;

        Ok(AssetGraph::from_pools(&self.pools, source, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RouterError;

    fn asset(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    #[test]
    fn test_builder_matches_from_pools() {
        let pools = vec![
            Pool::new(Address::repeat_byte(0xa1), asset(3), asset(1)).unwrap(),
            Pool::new(Address::repeat_byte(0xa2), asset(1), asset(2)).unwrap(),
        ];

        let graph = AssetGraphBuilder::new()
            .add_pools(pools.clone())
            .source(asset(1))
            .destination(asset(9))
            .build()
            .unwrap();

        assert_eq!(graph.assets(), AssetGraph::from_pools(&pools, asset(1), asset(9)).assets());
        assert_eq!(graph.assets(), &[asset(3), asset(1), asset(2), asset(9)]);
        assert_eq!(graph.pool_count(), 2);
    }

    #[test]
    fn test_builder_requires_endpoints() {
        let missing_source = AssetGraphBuilder::new().destination(asset(2)).build();
        assert!(matches!(
            missing_source,
            Err(RouterError::Graph(GraphError::MissingEndpoint { role: "source" }))
        ));

        let missing_destination = AssetGraphBuilder::new().source(asset(1)).build();
        assert!(matches!(
            missing_destination,
            Err(RouterError::Graph(GraphError::MissingEndpoint { role: "destination" }))
        ));
    }
}
