pub mod search;
pub mod selector;
pub mod types;

pub use search::{best_trade_exact_in, best_trade_exact_out, trades_exact_in, trades_exact_out};
pub use selector::{best_trade, compare_trades, sort_trades};
pub use types::BestTradeOptions;
