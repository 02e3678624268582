//! Configuration loader and application settings.

use std::path::PathBuf;

use crate::errors::{AppError, Result};

const DEFAULT_MIN_LIQUIDITY_USD: f64 = 1_000.0;
const DEFAULT_MAX_HOPS: usize = 3;

/// Settings for USD price discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    /// Pivot token every price is routed against (the wrapped native asset).
    pub reference_asset_id: String,
    /// Pools pairing the reference asset whose reference side is worth less
    /// than this are ignored during route search.
    pub min_liquidity_usd: f64,
    /// Whether the 0.3% pool fee is charged on pricing routes.
    pub apply_fee: bool,
    pub max_hops: usize,
}

impl OracleConfig {
    pub fn new(reference_asset_id: impl Into<String>, min_liquidity_usd: f64) -> Self {
        Self {
            reference_asset_id: reference_asset_id.into(),
            min_liquidity_usd,
            apply_fee: false,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file holding the pool snapshot.
    pub snapshot_path: PathBuf,
    /// Current USD price of the reference asset.
    pub reference_price_usd: f64,
    /// Tokens to price; empty means every token in the snapshot.
    pub tokens: Vec<String>,
    pub oracle: OracleConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };

        let snapshot_path = PathBuf::from(required("SNAPSHOT_PATH")?);
        let reference_asset_id = required("REFERENCE_ASSET")?.trim().to_string();
        let reference_price_usd: f64 = required("REFERENCE_PRICE_USD")?.trim().parse()?;

        let min_liquidity_usd = match lookup("MIN_LIQUIDITY_USD") {
            Some(raw) => raw.trim().parse()?,
            None => DEFAULT_MIN_LIQUIDITY_USD,
        };
        let max_hops = match lookup("MAX_HOPS") {
            Some(raw) => raw.trim().parse()?,
            None => DEFAULT_MAX_HOPS,
        };
        if max_hops == 0 {
            return Err(AppError::Config("MAX_HOPS must be at least 1".into()));
        }
        let apply_fee = lookup("PRICE_APPLY_FEE").is_some_and(|v| v.trim() == "1");

        let tokens = lookup("PRICE_TOKENS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            snapshot_path,
            reference_price_usd,
            tokens,
            oracle: OracleConfig {
                reference_asset_id,
                min_liquidity_usd,
                apply_fee,
                max_hops,
            },
        })
    }
}
