//! Exhaustive depth-first route search over a pool snapshot.
//!
//! A pool consumed by a route is excluded only further down that same
//! route; sibling branches may still use it. Pools with empty reserves are
//! not skipped, they simply produce zero-output trades that rank last.

use bigdecimal::BigDecimal;
use num_bigint::Sign;
use tracing::debug;

use super::selector::sort_trades;
use super::types::BestTradeOptions;
use crate::dex::{Pool, compute_amount_out, get_amount_in};
use crate::errors::{AppError, Result};
use crate::models::{Trade, TradeType};
use crate::utils::{format_units, parse_units};

/// Every route of at most `options.max_hops` pools that sells exactly
/// `amount_in` of `currency_in` for `currency_out`, in discovery order.
pub fn trades_exact_in(
    pools: &[Pool],
    amount_in: &BigDecimal,
    currency_in: &str,
    currency_out: &str,
    apply_fee: bool,
    options: BestTradeOptions,
) -> Result<Vec<Trade>> {
    ensure_non_negative(amount_in)?;
    if pools.is_empty() || options.max_hops == 0 || currency_in == currency_out {
        return Ok(Vec::new());
    }

    let mut search = ExactInSearch {
        pools,
        currency_in,
        currency_out,
        amount_in,
        apply_fee,
        used: vec![false; pools.len()],
        route: Vec::with_capacity(options.max_hops),
        path: vec![currency_in],
        trades: Vec::new(),
    };
    search.walk(currency_in, amount_in, options.max_hops)?;

    debug!(
        currency_in,
        currency_out,
        %amount_in,
        trades = search.trades.len(),
        "[ROUTER] exact-in search done"
    );
    Ok(search.trades)
}

/// Every route of at most `options.max_hops` pools that buys exactly
/// `amount_out` of `currency_out` with `currency_in`, in discovery order.
///
/// Pools that cannot pay out the requested amount are skipped.
pub fn trades_exact_out(
    pools: &[Pool],
    amount_out: &BigDecimal,
    currency_in: &str,
    currency_out: &str,
    apply_fee: bool,
    options: BestTradeOptions,
) -> Result<Vec<Trade>> {
    ensure_non_negative(amount_out)?;
    if pools.is_empty() || options.max_hops == 0 || currency_in == currency_out {
        return Ok(Vec::new());
    }

    let mut search = ExactOutSearch {
        pools,
        currency_in,
        currency_out,
        amount_out,
        apply_fee,
        used: vec![false; pools.len()],
        route: Vec::with_capacity(options.max_hops),
        path: vec![currency_out],
        trades: Vec::new(),
    };
    search.walk(currency_out, amount_out, options.max_hops)?;

    debug!(
        currency_in,
        currency_out,
        %amount_out,
        trades = search.trades.len(),
        "[ROUTER] exact-out search done"
    );
    Ok(search.trades)
}

/// [`trades_exact_in`], sorted best-first.
pub fn best_trade_exact_in(
    pools: &[Pool],
    amount_in: &BigDecimal,
    currency_in: &str,
    currency_out: &str,
    apply_fee: bool,
    options: BestTradeOptions,
) -> Result<Vec<Trade>> {
    let mut trades = trades_exact_in(pools, amount_in, currency_in, currency_out, apply_fee, options)?;
    sort_trades(&mut trades);
    Ok(trades)
}

/// [`trades_exact_out`], sorted best-first.
pub fn best_trade_exact_out(
    pools: &[Pool],
    amount_out: &BigDecimal,
    currency_in: &str,
    currency_out: &str,
    apply_fee: bool,
    options: BestTradeOptions,
) -> Result<Vec<Trade>> {
    let mut trades =
        trades_exact_out(pools, amount_out, currency_in, currency_out, apply_fee, options)?;
    sort_trades(&mut trades);
    Ok(trades)
}

fn ensure_non_negative(amount: &BigDecimal) -> Result<()> {
    if amount.sign() == Sign::Minus {
        return Err(AppError::InvalidAmount(format!("negative amount {amount}")));
    }
    Ok(())
}

struct ExactInSearch<'a> {
    pools: &'a [Pool],
    currency_in: &'a str,
    currency_out: &'a str,
    amount_in: &'a BigDecimal,
    apply_fee: bool,
    /// Pools on the current branch.
    used: Vec<bool>,
    route: Vec<usize>,
    /// Tokens reached so far, starting with `currency_in`.
    path: Vec<&'a str>,
    trades: Vec<Trade>,
}

impl<'a> ExactInSearch<'a> {
    fn walk(&mut self, token_in: &'a str, amount_in: &BigDecimal, hops_left: usize) -> Result<()> {
        let pools = self.pools;
        for (index, pool) in pools.iter().enumerate() {
            if self.used[index] {
                continue;
            }
            let Some(side) = pool.orient(token_in) else {
                continue;
            };

            let amount_out = compute_amount_out(
                amount_in,
                side.reserve_in,
                side.reserve_out,
                side.decimals_in,
                side.decimals_out,
                self.apply_fee,
            )?;

            if side.token_out == self.currency_out {
                self.route.push(index);
                self.path.push(side.token_out);
                let trade = self.trade(amount_out);
                self.path.pop();
                self.route.pop();
                self.trades.push(trade);
            } else if hops_left > 1 && pools.len() - self.route.len() > 1 {
                self.used[index] = true;
                self.route.push(index);
                self.path.push(side.token_out);
                self.walk(side.token_out, &amount_out, hops_left - 1)?;
                self.path.pop();
                self.route.pop();
                self.used[index] = false;
            }
        }
        Ok(())
    }

    fn trade(&self, amount_out: BigDecimal) -> Trade {
        Trade {
            trade_type: TradeType::ExactInput,
            pools: self.route.iter().map(|&i| self.pools[i].clone()).collect(),
            pool_indices: self.route.clone(),
            currency_in: self.currency_in.to_string(),
            currency_out: self.currency_out.to_string(),
            amount_in: self.amount_in.clone(),
            amount_out,
            path: self.path.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Walks backwards from `currency_out`; `route` and `path` are therefore
/// held in reverse and flipped when a trade is emitted.
struct ExactOutSearch<'a> {
    pools: &'a [Pool],
    currency_in: &'a str,
    currency_out: &'a str,
    amount_out: &'a BigDecimal,
    apply_fee: bool,
    used: Vec<bool>,
    route: Vec<usize>,
    path: Vec<&'a str>,
    trades: Vec<Trade>,
}

impl<'a> ExactOutSearch<'a> {
    fn walk(
        &mut self,
        token_out: &'a str,
        amount_out: &BigDecimal,
        hops_left: usize,
    ) -> Result<()> {
        let pools = self.pools;
        for (index, pool) in pools.iter().enumerate() {
            if self.used[index] {
                continue;
            }
            let Some(token_in) = pool.other_token(token_out) else {
                continue;
            };
            let Some(side) = pool.orient(token_in) else {
                continue;
            };

            let wanted = parse_units(amount_out, side.decimals_out)?;
            if &wanted >= side.reserve_out {
                continue;
            }
            let amount_in = format_units(
                &get_amount_in(&wanted, side.reserve_in, side.reserve_out, self.apply_fee),
                side.decimals_in,
            );

            if side.token_in == self.currency_in {
                self.route.push(index);
                self.path.push(side.token_in);
                let trade = self.trade(amount_in);
                self.path.pop();
                self.route.pop();
                self.trades.push(trade);
            } else if hops_left > 1 && pools.len() - self.route.len() > 1 {
                self.used[index] = true;
                self.route.push(index);
                self.path.push(side.token_in);
                self.walk(side.token_in, &amount_in, hops_left - 1)?;
                self.path.pop();
                self.route.pop();
                self.used[index] = false;
            }
        }
        Ok(())
    }

    fn trade(&self, amount_in: BigDecimal) -> Trade {
        Trade {
            trade_type: TradeType::ExactOutput,
            pools: self
                .route
                .iter()
                .rev()
                .map(|&i| self.pools[i].clone())
                .collect(),
            pool_indices: self.route.iter().rev().copied().collect(),
            currency_in: self.currency_in.to_string(),
            currency_out: self.currency_out.to_string(),
            amount_in,
            amount_out: self.amount_out.clone(),
            path: self.path.iter().rev().map(|t| t.to_string()).collect(),
        }
    }
}
