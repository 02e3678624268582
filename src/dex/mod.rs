//! Constant-product pool snapshots and the exact swap math run against them.

pub mod calc;
pub mod state;

pub use calc::{compute_amount_in, compute_amount_out, get_amount_in, get_amount_out};
pub use state::{DirectedPool, Pool, load_snapshot, parse_snapshot};
