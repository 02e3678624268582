use std::cmp::Ordering;

use crate::models::{Trade, TradeType};

/// Total order over trades between the same pair of currencies. A trade
/// that sorts first is the better one.
///
/// Exact-input trades rank by larger output, then smaller input; exact-output
/// trades by smaller input, then larger output. Fewer hops breaks the
/// remaining ties.
pub fn compare_trades(a: &Trade, b: &Trade) -> Ordering {
    debug_assert_eq!(a.trade_type, b.trade_type, "mixed trade types");
    debug_assert!(
        a.currency_in == b.currency_in && a.currency_out == b.currency_out,
        "trades between different currencies"
    );
    let economic = match a.trade_type {
        TradeType::ExactInput => b
            .amount_out
            .cmp(&a.amount_out)
            .then_with(|| a.amount_in.cmp(&b.amount_in)),
        TradeType::ExactOutput => a
            .amount_in
            .cmp(&b.amount_in)
            .then_with(|| b.amount_out.cmp(&a.amount_out)),
    };
    economic.then_with(|| a.hops().cmp(&b.hops()))
}

/// Sort best-first. Equal trades keep their relative order.
pub fn sort_trades(trades: &mut [Trade]) {
    trades.sort_by(compare_trades);
}

/// The best trade, or `None` for an empty list. The earliest wins a full tie.
pub fn best_trade(trades: &[Trade]) -> Option<&Trade> {
    trades.iter().min_by(|a, b| compare_trades(a, b))
}
