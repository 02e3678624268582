use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use dex_router::{aggregator, config::AppConfig, dex::load_snapshot, oracle::PriceOracle, utils};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::from_env()?;
    let pools = load_snapshot(&config.snapshot_path)?;
    tracing::info!(
        pools = pools.len(),
        reference = %config.oracle.reference_asset_id,
        reference_price_usd = config.reference_price_usd,
        min_liquidity_usd = config.oracle.min_liquidity_usd,
        max_hops = config.oracle.max_hops,
        apply_fee = config.oracle.apply_fee,
        "[INIT] snapshot loaded"
    );

    // No explicit list: price everything the snapshot knows about.
    let tokens = if config.tokens.is_empty() {
        pools
            .iter()
            .flat_map(|p| [p.token0.clone(), p.token1.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        config.tokens.clone()
    };

    let oracle = Arc::new(PriceOracle::new(config.oracle.clone()));
    let prices = aggregator::price_tokens(
        oracle,
        Arc::new(pools),
        tokens,
        config.reference_price_usd,
    )
    .await;

    for (token, price_usd) in prices {
        tracing::info!(%token, %price_usd, "[PRICE]");
    }
    Ok(())
}
