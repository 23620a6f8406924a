//! Builder pattern for Router

use crate::config::RouterConfig;
use crate::errors::Result;
use crate::providers::{
    Collaborators, OnChainDecimalsReader, OnChainPairResolver, OnChainReserveReader, RpcCaller,
    StaticTopAssets, TopAssetPools,
};
use crate::router::Router;
use std::sync::Arc;

/// Builder for creating Router instances with a fluent API
#[derive(Debug, Clone)]
pub struct RouterBuilder {
    config: RouterConfig,
    collaborators: Option<Collaborators>,
}

impl RouterBuilder {
    /// Create a RouterBuilder from a RouterConfig
    ///
    /// # Arguments
    ///
    /// * `config` - The router configuration to use
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            config: config.clone(),
            collaborators: None,
        }
    }

    /// Use the given collaborators instead of the on-chain ones
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = Some(collaborators);
        self
    }

    /// Build the Router
    ///
    /// Without explicit collaborators, connects to `rpc_url` and wires the on-chain
    /// readers together with a top-asset pool enumerator.
    ///
    /// # Errors
    ///
    /// Returns an error if on-chain collaborators are needed and no valid RPC URL is
    /// configured
    pub fn build(self) -> Result<Router> {
        let collaborators = match self.collaborators {
            Some(collaborators) => collaborators,
            None => Self::onchain_collaborators(&self.config)?,
        };

        Ok(Router::new(collaborators).with_max_concurrency(self.config.max_concurrency))
    }

    fn onchain_collaborators(config: &RouterConfig) -> Result<Collaborators> {
        let rpc = RpcCaller::connect(config.require_rpc_url()?)?;

        let pairs = Arc::new(OnChainPairResolver::new(rpc.clone(), config.factory_address));
        let reserves = Arc::new(OnChainReserveReader::new(rpc.clone()));
        let decimals = Arc::new(OnChainDecimalsReader::new(rpc));
        let top_assets = Arc::new(StaticTopAssets::new(config.top_assets.clone()));

        let pools = TopAssetPools::new(top_assets, pairs.clone(), reserves.clone(), decimals.clone())
            .with_min_liquidity(config.min_liquidity)
            .with_max_concurrency(config.max_concurrency);

        tracing::debug!(
            factory = %config.factory_address,
            top_asset_count = config.top_assets.len(),
            "On-chain collaborators connected"
        );

        Ok(Collaborators {
            pairs,
            reserves,
            decimals,
            pools: Arc::new(pools),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RouterError, UtilityError};
    use crate::providers::StaticMarket;

    #[test]
    fn test_builder_requires_rpc_url_for_onchain() {
        let config = RouterConfig::for_testing();
        let result = RouterBuilder::from_config(&config).build();
        assert!(matches!(
            result,
            Err(RouterError::Utility(UtilityError::MissingEnvironmentVariable { name: "ROUTER_RPC_URL" }))
        ));
    }

    #[test]
    fn test_builder_with_collaborators() {
        let mut config = RouterConfig::for_testing();
        config.max_concurrency = 3;

        let market = Arc::new(StaticMarket::new());
        let router = RouterBuilder::from_config(&config)
            .with_collaborators(Collaborators::from_shared(market))
            .build()
            .unwrap();
        assert_eq!(router.max_concurrency(), 3);
    }

    #[tokio::test]
    async fn test_builder_onchain_wiring() {
        let mut config = RouterConfig::for_testing();
        config.rpc_url = Some("http://127.0.0.1:8545".to_string());

        // Connecting is lazy; no request is sent until the first call
        let router = RouterBuilder::from_config(&config).build().unwrap();
        assert_eq!(router.max_concurrency(), config.max_concurrency);
    }
}
