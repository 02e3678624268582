use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer};

use crate::errors::{AppError, Result};

/// Immutable snapshot of one constant-product pool, as handed over by the
/// pool-data feed. Reserves are raw minor units.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Pool {
    pub token0: String,
    pub token1: String,
    #[serde(deserialize_with = "biguint_from_str")]
    pub reserve0: BigUint,
    #[serde(deserialize_with = "biguint_from_str")]
    pub reserve1: BigUint,
    pub decimals0: u8,
    pub decimals1: u8,
}

/// One pool seen from the side of the token being sold into it.
#[derive(Clone, Copy, Debug)]
pub struct DirectedPool<'a> {
    pub token_in: &'a str,
    pub token_out: &'a str,
    pub reserve_in: &'a BigUint,
    pub reserve_out: &'a BigUint,
    pub decimals_in: u8,
    pub decimals_out: u8,
}

impl Pool {
    pub fn new(
        token0: impl Into<String>,
        token1: impl Into<String>,
        reserve0: BigUint,
        reserve1: BigUint,
        decimals0: u8,
        decimals1: u8,
    ) -> Self {
        Self {
            token0: token0.into(),
            token1: token1.into(),
            reserve0,
            reserve1,
            decimals0,
            decimals1,
        }
    }

    pub fn involves(&self, token: &str) -> bool {
        self.token0 == token || self.token1 == token
    }

    /// The opposite side of `token`, or `None` if the pool does not hold it.
    pub fn other_token(&self, token: &str) -> Option<&str> {
        if self.token0 == token {
            Some(&self.token1)
        } else if self.token1 == token {
            Some(&self.token0)
        } else {
            None
        }
    }

    pub fn reserve_of(&self, token: &str) -> Option<&BigUint> {
        if self.token0 == token {
            Some(&self.reserve0)
        } else if self.token1 == token {
            Some(&self.reserve1)
        } else {
            None
        }
    }

    pub fn decimals_of(&self, token: &str) -> Option<u8> {
        if self.token0 == token {
            Some(self.decimals0)
        } else if self.token1 == token {
            Some(self.decimals1)
        } else {
            None
        }
    }

    /// Orient the pool so that `token_in` is sold into it.
    pub fn orient(&self, token_in: &str) -> Option<DirectedPool<'_>> {
        if self.token0 == token_in {
            Some(DirectedPool {
                token_in: &self.token0,
                token_out: &self.token1,
                reserve_in: &self.reserve0,
                reserve_out: &self.reserve1,
                decimals_in: self.decimals0,
                decimals_out: self.decimals1,
            })
        } else if self.token1 == token_in {
            Some(DirectedPool {
                token_in: &self.token1,
                token_out: &self.token0,
                reserve_in: &self.reserve1,
                reserve_out: &self.reserve0,
                decimals_in: self.decimals1,
                decimals_out: self.decimals0,
            })
        } else {
            None
        }
    }

    /// Whether the pool connects exactly these two tokens, in either order.
    pub fn pairs(&self, a: &str, b: &str) -> bool {
        (self.token0 == a && self.token1 == b) || (self.token0 == b && self.token1 == a)
    }
}

/// Parse a JSON array of pools. A pool pairing a token with itself is
/// rejected.
pub fn parse_snapshot(raw: &str) -> Result<Vec<Pool>> {
    let pools: Vec<Pool> = serde_json::from_str(raw)?;
    if let Some((index, pool)) = pools
        .iter()
        .enumerate()
        .find(|(_, p)| p.token0 == p.token1)
    {
        return Err(AppError::InvalidPool(format!(
            "pool {index} pairs {} with itself",
            pool.token0
        )));
    }
    Ok(pools)
}

/// Read and parse a pool snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<Pool>> {
    let raw = std::fs::read_to_string(path)?;
    parse_snapshot(&raw)
}

fn biguint_from_str<'de, D>(deserializer: D) -> std::result::Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse::<BigUint>()
        .map_err(|e| serde::de::Error::custom(format!("invalid reserve {raw:?}: {e}")))
}
