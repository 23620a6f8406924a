pub mod cli;

use alloy::primitives::Address;
use amm_hop_router::config::MAINNET_TOP_ASSETS;
use amm_hop_router::errors::Result;
use amm_hop_router::providers::{Collaborators, StaticMarket};
use amm_hop_router::utils::format_rate;
use amm_hop_router::{RouterBuilder, RouterConfig};
use num_bigint::BigUint;
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quote_cli=info".parse::<Directive>().map_err(anyhow::Error::from)?)
                .add_directive("amm_hop_router=info".parse::<Directive>().map_err(anyhow::Error::from)?),
        )
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_cli_args();
    let config = RouterConfig::from_env()?;
    let source = args.source()?;
    let destination = args.destination()?;

    let mut builder = RouterBuilder::from_config(&config);
    if args.offline {
        tracing::info!("Using the built-in offline market");
        builder = builder.with_collaborators(Collaborators::from_shared(Arc::new(offline_market())));
    }
    let router = builder.build()?;

    let direct = match router.quote_direct(&config.quote_context(), source, destination).await {
        Ok(rate) => json!({ "rate": format_rate(&rate, args.precision) }),
        Err(e) if e.is_pair_not_found() => serde_json::Value::Null,
        Err(e) => return Err(e),
    };

    let route = router
        .route(&config.quote_context(), source, destination, config.max_hops)
        .await?;

    let output = json!({
        "source": source.to_string(),
        "destination": destination.to_string(),
        "max_hops": config.max_hops,
        "direct": direct,
        "route": route.summary(args.precision),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// A small snapshot of mainnet-like reserves between the default top assets.
fn offline_market() -> StaticMarket {
    let [weth, usdc, dai, usdt, wbtc, uni] = MAINNET_TOP_ASSETS;
    let units = |amount: u64, decimals: u32| BigUint::from(amount) * BigUint::from(10u32).pow(decimals);
    let pool = |n: u8| Address::repeat_byte(n);

    StaticMarket::new()
        .with_asset(weth, 18)
        .with_asset(usdc, 6)
        .with_asset(dai, 18)
        .with_asset(usdt, 6)
        .with_asset(wbtc, 8)
        .with_asset(uni, 18)
        .with_top_assets(MAINNET_TOP_ASSETS)
        .with_pool(pool(0x11), (weth, units(10_000, 18)), (usdc, units(30_000_000, 6)))
        .with_pool(pool(0x12), (weth, units(5_000, 18)), (dai, units(15_100_000, 18)))
        .with_pool(pool(0x13), (weth, units(8_000, 18)), (usdt, units(24_050_000, 6)))
        .with_pool(pool(0x14), (wbtc, units(500, 8)), (weth, units(10_000, 18)))
        .with_pool(pool(0x15), (uni, units(1_000_000, 18)), (weth, units(3_000, 18)))
        .with_pool(pool(0x16), (usdc, units(50_000_000, 6)), (dai, units(50_020_000, 18)))
        .with_pool(pool(0x17), (usdc, units(40_000_000, 6)), (usdt, units(39_990_000, 6)))
}
