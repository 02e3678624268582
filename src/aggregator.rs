//! Prices a batch of tokens concurrently against one shared snapshot.

use std::sync::Arc;

use crate::{
    dex::Pool,
    oracle::{PriceOracle, UNDISCOVERABLE_PRICE},
};

/// Price every token in `tokens`, returning `(token, price)` pairs in the
/// same order. Route search is CPU bound, so each token runs on the blocking
/// pool; the snapshot is shared, never copied.
pub async fn price_tokens(
    oracle: Arc<PriceOracle>,
    pools: Arc<Vec<Pool>>,
    tokens: Vec<String>,
    reference_price_usd: f64,
) -> Vec<(String, String)> {
    let handles = tokens.iter().cloned().map(|token| {
        let oracle = Arc::clone(&oracle);
        let pools = Arc::clone(&pools);
        tokio::task::spawn_blocking(move || {
            oracle.token_price_usd(&pools, &token, reference_price_usd)
        })
    });

    let results = futures::future::join_all(handles).await;
    tokens
        .into_iter()
        .zip(results)
        .map(|(token, joined)| match joined {
            Ok(price) => (token, price),
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "[PRICE] pricing task failed");
                (token, UNDISCOVERABLE_PRICE.to_string())
            }
        })
        .collect()
}
