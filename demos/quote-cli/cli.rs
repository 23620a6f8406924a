use amm_hop_router::errors::Result;
use amm_hop_router::utils::string_to_h160;
use alloy::primitives::Address;
use clap::Parser;

const TOKEN_SYMBOLS: &[(&str, &str)] = &[
    ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
    ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    ("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
    ("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7"),
    ("WBTC", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
    ("UNI", "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
];

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(long, help = "Asset to convert from (symbol such as WETH, or address)")]
    pub from: String,

    #[clap(long, help = "Asset to convert to (symbol such as USDC, or address)")]
    pub to: String,

    #[clap(long, env = "ROUTER_MAX_HOPS", help = "Maximum number of pools to route through (1-5)")]
    pub max_hops: Option<usize>,

    #[clap(long, env = "ROUTER_RPC_URL", help = "RPC URL for on-chain interaction")]
    pub rpc_url: Option<String>,

    #[clap(long, env = "ROUTER_MIN_LIQUIDITY", help = "Whole units required on each side of a candidate pool")]
    pub min_liquidity: Option<u64>,

    #[clap(long, default_value_t = 18, help = "Fractional digits printed for rates")]
    pub precision: usize,

    #[clap(long, help = "Quote against a built-in fixed market instead of the chain")]
    pub offline: bool,
}

impl Args {
    /// Set environment variables from parsed CLI arguments so the config module
    /// sees command-line overrides
    pub fn set_environment_variables(&self) {
        use std::env;

        if let Some(rpc_url) = &self.rpc_url {
            env::set_var("ROUTER_RPC_URL", rpc_url);
        }
        if let Some(max_hops) = self.max_hops {
            env::set_var("ROUTER_MAX_HOPS", max_hops.to_string());
        }
        if let Some(min_liquidity) = self.min_liquidity {
            env::set_var("ROUTER_MIN_LIQUIDITY", min_liquidity.to_string());
        }

        tracing::debug!(
            has_rpc_url = self.rpc_url.is_some(),
            max_hops = ?self.max_hops,
            min_liquidity = ?self.min_liquidity,
            offline = self.offline,
            "Environment variables set from CLI arguments"
        );
    }

    pub fn source(&self) -> Result<Address> {
        Self::resolve_asset(&self.from)
    }

    pub fn destination(&self) -> Result<Address> {
        Self::resolve_asset(&self.to)
    }

    fn resolve_asset(token: &str) -> Result<Address> {
        let symbol = token.to_ascii_uppercase();
        match TOKEN_SYMBOLS.iter().find(|(s, _)| *s == symbol) {
            Some((_, address)) => string_to_h160(address),
            None => string_to_h160(token),
        }
    }
}

pub fn parse_cli_args() -> Args {
    let args = Args::parse();
    args.set_environment_variables();
    args
}
