/// Bounds for a best-trade search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestTradeOptions {
    /// Maximum number of pools a route may cross.
    pub max_hops: usize,
    /// Not used to trim results: every route within `max_hops` is returned.
    pub max_num_results: usize,
}

impl Default for BestTradeOptions {
    fn default() -> Self {
        Self {
            max_hops: 3,
            max_num_results: 3,
        }
    }
}

impl BestTradeOptions {
    pub fn with_max_hops(max_hops: usize) -> Self {
        Self {
            max_hops,
            ..Self::default()
        }
    }
}
