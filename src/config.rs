//! Configuration management for the routing engine.
//!
//! This module loads router settings from environment variables, validates each value
//! and falls back to Ethereum mainnet defaults where a setting is optional.

use crate::context::QuoteContext;
use crate::errors::{Result, UtilityError};
use crate::router::MAX_HOPS;
use alloy::primitives::{address, Address};
use std::env;
use std::time::Duration;

/// Uniswap V2 factory on Ethereum mainnet
pub const UNISWAP_V2_FACTORY: Address = address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");

/// Widely traded Ethereum mainnet assets: WETH, USDC, DAI, USDT, WBTC, UNI
pub const MAINNET_TOP_ASSETS: [Address; 6] = [
    address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
    address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    address!("6B175474E89094C44Da98b954EedeAC495271d0F"),
    address!("dAC17F958D2ee523a2206206994597C13D831ec7"),
    address!("2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
    address!("1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
];

const DEFAULT_MAX_CONCURRENCY: usize = 8;
const MAX_CONCURRENCY_LIMIT: usize = 64;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_HOPS: usize = 3;

/// Settings shared by the router, its collaborators and the demo binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// JSON-RPC endpoint for the on-chain collaborators
    pub rpc_url: Option<String>,
    /// Factory used to resolve pairs
    pub factory_address: Address,
    /// Assets whose mutual pools form the candidate set
    pub top_assets: Vec<Address>,
    /// Whole units required on each side of a candidate pool
    pub min_liquidity: u64,
    /// Upper bound on in-flight collaborator calls
    pub max_concurrency: usize,
    /// Deadline for one route computation; `None` disables it
    pub timeout: Option<Duration>,
    /// Hop limit used when the caller does not pass one
    pub max_hops: usize,
}

impl RouterConfig {
    /// Create a new configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `ROUTER_RPC_URL`: RPC URL for on-chain interaction (needed only by the
    ///   on-chain collaborators)
    /// - `ROUTER_FACTORY_ADDRESS`: pair factory (default: Uniswap V2 mainnet factory)
    /// - `ROUTER_TOP_ASSETS`: comma-separated asset addresses (default: mainnet WETH,
    ///   USDC, DAI, USDT, WBTC, UNI)
    /// - `ROUTER_MIN_LIQUIDITY`: whole units per pool side (default: 0)
    /// - `ROUTER_MAX_CONCURRENCY`: 1 to 64 (default: 8)
    /// - `ROUTER_TIMEOUT_MS`: computation deadline, 0 disables it (default: 10000)
    /// - `ROUTER_MAX_HOPS`: 1 to 5 (default: 3)
    ///
    /// # Errors
    ///
    /// Returns an error if any variable that is set fails to parse or is out of range.
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading router configuration from environment");

        let rpc_url = match env::var("ROUTER_RPC_URL") {
            Ok(rpc_url) => {
                Self::validate_rpc_url(&rpc_url)?;
                tracing::debug!(rpc_url = rpc_url, "Valid ROUTER_RPC_URL value");
                Some(rpc_url)
            }
            Err(_) => {
                tracing::debug!("ROUTER_RPC_URL not set, on-chain collaborators unavailable");
                None
            }
        };

        let factory_address = match env::var("ROUTER_FACTORY_ADDRESS") {
            Ok(address_str) => {
                let factory = Self::parse_address(&address_str, "ROUTER_FACTORY_ADDRESS")?;
                tracing::debug!(factory = %factory, "Using custom factory address from environment");
                factory
            }
            Err(_) => {
                tracing::debug!(factory = %UNISWAP_V2_FACTORY, "Using default Uniswap V2 factory");
                UNISWAP_V2_FACTORY
            }
        };

        let top_assets = match env::var("ROUTER_TOP_ASSETS") {
            Ok(list) => {
                let assets = crate::utils::parse_address_list(&list).map_err(|e| {
                    UtilityError::InvalidConfiguration {
                        message: format!("Failed to parse ROUTER_TOP_ASSETS: {}", e),
                    }
                })?;
                if assets.len() < 2 {
                    return Err(UtilityError::InvalidConfiguration {
                        message: "ROUTER_TOP_ASSETS must list at least two assets".to_string(),
                    }
                    .into());
                }
                tracing::debug!(asset_count = assets.len(), "Top assets loaded from environment");
                assets
            }
            Err(_) => {
                tracing::debug!(asset_count = MAINNET_TOP_ASSETS.len(), "Using default mainnet top assets");
                MAINNET_TOP_ASSETS.to_vec()
            }
        };

        let min_liquidity = Self::parse_bounded("ROUTER_MIN_LIQUIDITY", 0u64, 0, u64::MAX)?;
        let max_concurrency = Self::parse_bounded(
            "ROUTER_MAX_CONCURRENCY",
            DEFAULT_MAX_CONCURRENCY,
            1,
            MAX_CONCURRENCY_LIMIT,
        )?;
        let timeout_ms = Self::parse_bounded("ROUTER_TIMEOUT_MS", DEFAULT_TIMEOUT_MS, 0, u64::MAX)?;
        let max_hops = Self::parse_bounded("ROUTER_MAX_HOPS", DEFAULT_MAX_HOPS, 1, MAX_HOPS)?;

        let config = Self {
            rpc_url,
            factory_address,
            top_assets,
            min_liquidity,
            max_concurrency,
            timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            max_hops,
        };

        tracing::info!(
            factory = %config.factory_address,
            top_asset_count = config.top_assets.len(),
            min_liquidity = config.min_liquidity,
            max_concurrency = config.max_concurrency,
            timeout_ms = timeout_ms,
            max_hops = config.max_hops,
            has_rpc_url = config.rpc_url.is_some(),
            "Router configuration loaded successfully"
        );

        Ok(config)
    }

    /// Create a configuration with mainnet defaults without reading the environment
    pub fn for_testing() -> Self {
        Self {
            rpc_url: None,
            factory_address: UNISWAP_V2_FACTORY,
            top_assets: MAINNET_TOP_ASSETS.to_vec(),
            min_liquidity: 0,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// The RPC URL, or an error naming the missing variable
    pub fn require_rpc_url(&self) -> Result<&str> {
        self.rpc_url.as_deref().ok_or_else(|| {
            UtilityError::MissingEnvironmentVariable { name: "ROUTER_RPC_URL" }.into()
        })
    }

    /// A fresh computation context carrying the configured deadline
    pub fn quote_context(&self) -> QuoteContext {
        match self.timeout {
            Some(timeout) => QuoteContext::with_timeout(timeout),
            None => QuoteContext::new(),
        }
    }

    /// Read an integer variable, falling back to `default` when unset
    fn parse_bounded<T>(var_name: &'static str, default: T, min: T, max: T) -> Result<T>
    where
        T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
    {
        let Ok(raw) = env::var(var_name) else {
            tracing::debug!(var = var_name, default = %default, "Variable not set, using default");
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(value) if value >= min && value <= max => {
                tracing::debug!(var = var_name, value = %value, "Valid value");
                Ok(value)
            }
            Ok(value) => {
                tracing::error!(var = var_name, value = %value, "Value out of range");
                Err(UtilityError::InvalidConfiguration {
                    message: format!("{} must be between {} and {}, got: {}", var_name, min, max, value),
                }
                .into())
            }
            Err(_) => Err(UtilityError::InvalidConfiguration {
                message: format!("Invalid {} value: {}. Must be a valid integer", var_name, raw),
            }
            .into()),
        }
    }

    /// Parse and validate an Ethereum address from a string
    fn parse_address(address_str: &str, var_name: &str) -> Result<Address> {
        crate::utils::string_to_h160(address_str).map_err(|e| {
            UtilityError::InvalidConfiguration {
                message: format!("Failed to parse {}: {}", var_name, e),
            }
            .into()
        })
    }

    fn validate_rpc_url(rpc_url: &str) -> Result<()> {
        if rpc_url.is_empty() {
            return Err(UtilityError::InvalidConfiguration {
                message: "ROUTER_RPC_URL cannot be empty".to_string(),
            }
            .into());
        }
        // Basic URL validation
        if url::Url::parse(rpc_url).is_err() {
            return Err(UtilityError::InvalidConfiguration {
                message: format!("Invalid ROUTER_RPC_URL format: {}", rpc_url),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests don't interfere with each other's environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "ROUTER_RPC_URL",
        "ROUTER_FACTORY_ADDRESS",
        "ROUTER_TOP_ASSETS",
        "ROUTER_MIN_LIQUIDITY",
        "ROUTER_MAX_CONCURRENCY",
        "ROUTER_TIMEOUT_MS",
        "ROUTER_MAX_HOPS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = RouterConfig::from_env().unwrap();
        assert_eq!(config, RouterConfig::for_testing());
        assert!(config.require_rpc_url().is_err());
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("ROUTER_RPC_URL", "https://eth.example.org");
        env::set_var("ROUTER_FACTORY_ADDRESS", "0x0000000000000000000000000000000000000042");
        env::set_var(
            "ROUTER_TOP_ASSETS",
            "0x0000000000000000000000000000000000000001,0x0000000000000000000000000000000000000002",
        );
        env::set_var("ROUTER_MIN_LIQUIDITY", "500000");
        env::set_var("ROUTER_MAX_CONCURRENCY", "16");
        env::set_var("ROUTER_TIMEOUT_MS", "0");
        env::set_var("ROUTER_MAX_HOPS", "5");

        let config = RouterConfig::from_env().unwrap();
        assert_eq!(config.require_rpc_url().unwrap(), "https://eth.example.org");
        assert_eq!(config.factory_address, Address::with_last_byte(0x42));
        assert_eq!(config.top_assets, vec![Address::with_last_byte(1), Address::with_last_byte(2)]);
        assert_eq!(config.min_liquidity, 500_000);
        assert_eq!(config.max_concurrency, 16);
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_hops, 5);

        clear_env();
    }

    #[test]
    fn test_config_from_env_rejects_out_of_range() {
        let _guard = TEST_MUTEX.lock().unwrap();

        for (var, value) in [
            ("ROUTER_MAX_HOPS", "0"),
            ("ROUTER_MAX_HOPS", "6"),
            ("ROUTER_MAX_CONCURRENCY", "0"),
            ("ROUTER_MAX_CONCURRENCY", "65"),
            ("ROUTER_MIN_LIQUIDITY", "-1"),
            ("ROUTER_TIMEOUT_MS", "soon"),
        ] {
            clear_env();
            env::set_var(var, value);
            let result = RouterConfig::from_env();
            assert!(result.is_err(), "Expected error for {}={}", var, value);
            assert!(result.unwrap_err().to_string().contains(var));
        }

        clear_env();
    }

    #[test]
    fn test_config_from_env_rejects_bad_inputs() {
        let _guard = TEST_MUTEX.lock().unwrap();

        for (var, value) in [
            ("ROUTER_RPC_URL", ""),
            ("ROUTER_RPC_URL", "not a url"),
            ("ROUTER_FACTORY_ADDRESS", "0x1234"),
            ("ROUTER_TOP_ASSETS", "0x0000000000000000000000000000000000000001"),
            ("ROUTER_TOP_ASSETS", "0x0000000000000000000000000000000000000001,nope"),
        ] {
            clear_env();
            env::set_var(var, value);
            assert!(RouterConfig::from_env().is_err(), "Expected error for {}={:?}", var, value);
        }

        clear_env();
    }

    #[test]
    fn test_config_for_testing() {
        let config = RouterConfig::for_testing();
        assert_eq!(config.top_assets.len(), 6);
        assert_eq!(config.factory_address, UNISWAP_V2_FACTORY);
        assert_eq!(config.max_hops, 3);
        assert!(config.quote_context().check().is_ok());
    }
}
