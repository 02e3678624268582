//! Shared data structures used throughout the application.

use bigdecimal::BigDecimal;

use crate::dex::Pool;

/// Which side of a trade was fixed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    /// `amount_in` is given, `amount_out` is computed.
    ExactInput,
    /// `amount_out` is given, `amount_in` is computed.
    ExactOutput,
}

/// A candidate route through one or more pools, with its amounts in human
/// units.
///
/// `path` lists every token visited, so `path.len() == pools.len() + 1`,
/// `path[0] == currency_in` and the last entry is `currency_out`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub trade_type: TradeType,
    pub pools: Vec<Pool>,
    /// Positions of `pools` within the pool slice that was searched.
    pub pool_indices: Vec<usize>,
    pub currency_in: String,
    pub currency_out: String,
    pub amount_in: BigDecimal,
    pub amount_out: BigDecimal,
    pub path: Vec<String>,
}

impl Trade {
    /// Number of pools crossed.
    pub fn hops(&self) -> usize {
        self.pools.len()
    }
}
