//! Multi-hop trade routing over constant-product pools, and USD price
//! discovery built on top of it.
//!
//! `dex` holds pool state and the swap math, `router` enumerates and ranks
//! routes, and `oracle` turns the best route against a reference asset into
//! a USD price.

pub mod aggregator;
pub mod config;
pub mod dex;
pub mod errors;
pub mod models;
pub mod oracle;
pub mod router;
pub mod utils;
