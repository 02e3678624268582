//! USD price discovery by routing a notional trade against the reference
//! asset.
//!
//! Reserve math stays in exact integers; floating point only appears once
//! amounts have been turned into human units and are being valued in USD.

use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};
use tracing::{debug, trace, warn};

use crate::config::OracleConfig;
use crate::dex::Pool;
use crate::router::{BestTradeOptions, best_trade, trades_exact_in};
use crate::utils::format_units;

/// Returned whenever no trustworthy price can be derived.
pub const UNDISCOVERABLE_PRICE: &str = "0";

/// Derives USD unit prices from a pool snapshot. Holds no pool state; every
/// call works on the snapshot it is given.
#[derive(Debug, Clone)]
pub struct PriceOracle {
    config: OracleConfig,
}

impl PriceOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    /// USD price of one whole `token`, as a decimal string, or
    /// [`UNDISCOVERABLE_PRICE`].
    pub fn token_price_usd(&self, pools: &[Pool], token: &str, reference_price_usd: f64) -> String {
        // NaN and negative feeds count as unavailable too.
        if !(reference_price_usd > 0.0) {
            return UNDISCOVERABLE_PRICE.to_string();
        }
        let reference = self.config.reference_asset_id.as_str();
        if token == reference {
            return reference_price_usd.to_string();
        }

        let liquid = self.liquid_pools(pools, reference_price_usd);

        if let Some(price) = direct_pool_price(&liquid, token, reference, reference_price_usd) {
            debug!(token, %price, "[ORACLE] priced from direct pool");
            return price;
        }

        let one = BigDecimal::from(1);
        let Some(amount_out) = self.best_amount_out(&liquid, &one, reference, token) else {
            debug!(token, "[ORACLE] no route from reference asset");
            return UNDISCOVERABLE_PRICE.to_string();
        };

        let price = if amount_out.is_zero() {
            // One reference unit is worth less than one minor unit of the
            // token; ask the other way round instead.
            trace!(token, "[ORACLE] forward quote truncated to zero, reversing");
            match self.best_amount_out(&liquid, &one, token, reference) {
                Some(back) if !back.is_zero() => {
                    back.to_f64().map(|back| reference_price_usd * back)
                }
                _ => None,
            }
        } else {
            amount_out.to_f64().map(|out| reference_price_usd / out)
        };

        match price.and_then(finite_price) {
            Some(price) => {
                debug!(token, %price, "[ORACLE] priced from route search");
                price
            }
            None => UNDISCOVERABLE_PRICE.to_string(),
        }
    }

    /// Pools usable for price discovery: both reserves present, and any pool
    /// touching the reference asset must hold at least `min_liquidity_usd`
    /// worth of it.
    fn liquid_pools(&self, pools: &[Pool], reference_price_usd: f64) -> Vec<Pool> {
        let reference = self.config.reference_asset_id.as_str();
        pools
            .iter()
            .filter(|pool| {
                if pool.reserve0.is_zero() || pool.reserve1.is_zero() {
                    trace!(token0 = %pool.token0, token1 = %pool.token1, "[ORACLE] skipping empty pool");
                    return false;
                }
                let (Some(reserve), Some(decimals)) =
                    (pool.reserve_of(reference), pool.decimals_of(reference))
                else {
                    return true;
                };
                let reserve_usd = format_units(reserve, decimals)
                    .to_f64()
                    .map_or(0.0, |r| r * reference_price_usd);
                let keep = reserve_usd >= self.config.min_liquidity_usd;
                if !keep {
                    trace!(
                        token0 = %pool.token0,
                        token1 = %pool.token1,
                        reserve_usd,
                        "[ORACLE] skipping thin reference pool"
                    );
                }
                keep
            })
            .cloned()
            .collect()
    }

    fn best_amount_out(
        &self,
        pools: &[Pool],
        amount_in: &BigDecimal,
        currency_in: &str,
        currency_out: &str,
    ) -> Option<BigDecimal> {
        let options = BestTradeOptions::with_max_hops(self.config.max_hops);
        match trades_exact_in(
            pools,
            amount_in,
            currency_in,
            currency_out,
            self.config.apply_fee,
            options,
        ) {
            Ok(trades) => best_trade(&trades).map(|t| t.amount_out.clone()),
            Err(e) => {
                warn!(error = %e, currency_in, currency_out, "[ORACLE] route search failed");
                None
            }
        }
    }
}

/// Price from the deepest pool pairing `token` directly with the reference
/// asset, if one exists. Depth is the reference reserve, then the token
/// reserve.
fn direct_pool_price(
    pools: &[Pool],
    token: &str,
    reference: &str,
    reference_price_usd: f64,
) -> Option<String> {
    let pool = pools
        .iter()
        .filter(|p| p.pairs(token, reference))
        .max_by(|a, b| {
            a.reserve_of(reference)
                .cmp(&b.reserve_of(reference))
                .then_with(|| a.reserve_of(token).cmp(&b.reserve_of(token)))
        })?;

    let token_reserve = format_units(pool.reserve_of(token)?, pool.decimals_of(token)?);
    let reference_reserve = format_units(pool.reserve_of(reference)?, pool.decimals_of(reference)?);
    if token_reserve.is_zero() || reference_reserve.is_zero() {
        return None;
    }
    let ratio = (token_reserve / reference_reserve).to_f64()?;
    finite_price(reference_price_usd / ratio)
}

fn finite_price(price: f64) -> Option<String> {
    (price.is_finite() && price > 0.0).then(|| price.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::get_amount_out;
    use num_bigint::BigUint;

    fn units(whole: u64, decimals: u32) -> BigUint {
        BigUint::from(whole) * BigUint::from(10u32).pow(decimals)
    }

    fn pool(a: &str, b: &str, reserve_a: BigUint, reserve_b: BigUint, dec_a: u8, dec_b: u8) -> Pool {
        Pool::new(a, b, reserve_a, reserve_b, dec_a, dec_b)
    }

    fn oracle(reference: &str, min_liquidity_usd: f64) -> PriceOracle {
        PriceOracle::new(OracleConfig::new(reference, min_liquidity_usd))
    }

    #[test]
    fn empty_snapshot() {
        let oracle = oracle("WETH", 1_000.0);
        assert_eq!(oracle.token_price_usd(&[], "USDC", 2_100.5), "0");
        assert_eq!(oracle.token_price_usd(&[], "WETH", 2_100.5), "2100.5");
    }

    #[test]
    fn zero_reference_price_is_undiscoverable() {
        let oracle = oracle("WETH", 0.0);
        let pools = vec![pool("WETH", "USDC", units(10, 18), units(20_000, 6), 18, 6)];
        assert_eq!(oracle.token_price_usd(&pools, "USDC", 0.0), UNDISCOVERABLE_PRICE);
        assert_eq!(oracle.token_price_usd(&pools, "WETH", 0.0), UNDISCOVERABLE_PRICE);
    }

    #[test]
    fn direct_pool_wins_over_deeper_route() {
        let oracle = oracle("WETH", 1_000.0);
        let pools = vec![
            // direct: 2,000 USDC per WETH
            pool("WETH", "USDC", units(1_000, 18), units(2_000_000, 6), 18, 6),
            // two-hop route at a different rate
            pool("WETH", "DAI", units(100_000, 18), units(300_000_000, 18), 18, 18),
            pool("DAI", "USDC", units(300_000_000, 18), units(300_000_000, 6), 18, 6),
        ];
        assert_eq!(oracle.token_price_usd(&pools, "USDC", 2_000.0), "1");
    }

    #[test]
    fn thin_direct_pool_falls_back_to_two_hop_route() {
        let oracle = oracle("WETH", 1_000.0);
        let pools = vec![
            pool("WETH", "B", units(1_000, 18), units(2_000_000, 18), 18, 18),
            pool("B", "C", units(3_000_000, 18), units(1_500_000, 6), 18, 6),
            // 0.1 WETH = $200 of liquidity
            pool("WETH", "C", units(1, 17), units(500, 6), 18, 6),
        ];
        let b_out = get_amount_out(&units(1, 18), &units(1_000, 18), &units(2_000_000, 18), false);
        let c_out = get_amount_out(&b_out, &units(3_000_000, 18), &units(1_500_000, 6), false);
        assert_eq!(c_out, BigUint::from(998_336_106u64));

        let c_whole = format_units(&c_out, 6).to_f64().unwrap();
        let price = oracle.token_price_usd(&pools, "C", 2_000.0);
        assert_eq!(price, (2_000.0 / c_whole).to_string());
    }

    #[test]
    fn truncated_forward_quote_uses_reverse_route() {
        let oracle = oracle("WBTC", 1_000.0);
        let pools = vec![
            pool("WBTC", "MID", units(100, 8), units(100, 18), 8, 18),
            // 1 TOK (2 decimals) against a million MID
            pool("MID", "TOK", units(1_000_000, 18), BigUint::from(100u32), 18, 2),
        ];
        let mid = get_amount_out(&BigUint::from(100u32), &BigUint::from(100u32), &units(1_000_000, 18), false);
        let wbtc = get_amount_out(&mid, &units(100, 18), &units(100, 8), false);
        assert_eq!(wbtc, BigUint::from(9_998_000_399u64));

        let wbtc_whole = format_units(&wbtc, 8).to_f64().unwrap();
        let price = oracle.token_price_usd(&pools, "TOK", 30_000.0);
        assert_eq!(price, (30_000.0 * wbtc_whole).to_string());
    }

    #[test]
    fn zero_reserve_direct_pool_is_not_divided_by() {
        let oracle = oracle("WETH", 1_000.0);
        let lonely = vec![pool("WETH", "TOK", units(1_000, 18), BigUint::from(0u32), 18, 18)];
        assert_eq!(oracle.token_price_usd(&lonely, "TOK", 2_000.0), "0");

        let mut routed = lonely.clone();
        routed.push(pool("WETH", "MID", units(1_000, 18), units(1_000, 18), 18, 18));
        routed.push(pool("MID", "TOK", units(1_000_000, 18), units(4_000_000, 18), 18, 18));
        let price = oracle.token_price_usd(&routed, "TOK", 2_000.0);
        assert_ne!(price, UNDISCOVERABLE_PRICE);
        // 1 WETH -> ~0.999 MID -> ~3.996 TOK
        let parsed: f64 = price.parse().unwrap();
        assert!(parsed > 450.0 && parsed < 550.0, "unexpected price {price}");
    }

    #[test]
    fn empty_pool_away_from_reference_is_not_routed() {
        let oracle = oracle("WETH", 1_000.0);
        let pools = vec![
            pool("WETH", "MID", units(1_000, 18), units(1_000, 18), 18, 18),
            // no TOK left; reversing through it would sell into an empty side
            pool("MID", "TOK", units(1_000, 18), BigUint::from(0u32), 18, 18),
        ];
        let liquid = oracle.liquid_pools(&pools, 2_000.0);
        assert_eq!(liquid, vec![pools[0].clone()]);
        assert_eq!(oracle.token_price_usd(&pools, "TOK", 2_000.0), UNDISCOVERABLE_PRICE);
    }

    #[test]
    fn equally_deep_direct_pools_price_independent_of_order() {
        let oracle = oracle("WETH", 1_000.0);
        let mut pools = vec![
            pool("WETH", "USDC", units(1_000, 18), units(2_000_000, 6), 18, 6),
            pool("USDC", "WETH", units(2_500_000, 6), units(1_000, 18), 6, 18),
        ];
        // the pool with more USDC wins the tie: 2,500 USDC per WETH
        assert_eq!(oracle.token_price_usd(&pools, "USDC", 2_000.0), "0.8");
        pools.reverse();
        assert_eq!(oracle.token_price_usd(&pools, "USDC", 2_000.0), "0.8");
    }

    #[test]
    fn unreachable_token_is_undiscoverable() {
        let oracle = oracle("WETH", 1_000.0);
        let pools = vec![
            pool("WETH", "USDC", units(1_000, 18), units(2_000_000, 6), 18, 6),
            pool("FOO", "BAR", units(10, 18), units(10, 18), 18, 18),
        ];
        assert_eq!(oracle.token_price_usd(&pools, "FOO", 2_000.0), "0");
    }

    #[test]
    fn result_does_not_depend_on_pool_order() {
        let oracle = oracle("WETH", 1_000.0);
        let mut pools = vec![
            pool("WETH", "B", units(1_000, 18), units(2_000_000, 18), 18, 18),
            pool("B", "C", units(3_000_000, 18), units(1_500_000, 6), 18, 6),
            pool("WETH", "D", units(500, 18), units(700, 18), 18, 18),
            pool("D", "C", units(700, 18), units(1_000, 6), 18, 6),
            pool("B", "D", units(9_000, 18), units(3, 18), 18, 18),
        ];
        let expected = oracle.token_price_usd(&pools, "C", 2_000.0);
        assert_ne!(expected, UNDISCOVERABLE_PRICE);
        pools.reverse();
        assert_eq!(oracle.token_price_usd(&pools, "C", 2_000.0), expected);
        pools.rotate_left(2);
        assert_eq!(oracle.token_price_usd(&pools, "C", 2_000.0), expected);
    }
}
