//! Miscellaneous helper utilities.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, BigUint, Sign};
use tracing_subscriber::{EnvFilter, fmt};

use crate::errors::{AppError, Result};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Convert a human amount into integer minor units (`amount * 10^decimals`).
///
/// Digits finer than one minor unit are dropped, never rounded up.
pub fn parse_units(amount: &BigDecimal, decimals: u8) -> Result<BigUint> {
    if amount.sign() == Sign::Minus {
        return Err(AppError::InvalidAmount(format!("negative amount {amount}")));
    }
    let (digits, _scale) = amount
        .with_scale_round(i64::from(decimals), RoundingMode::Down)
        .into_bigint_and_exponent();
    digits
        .to_biguint()
        .ok_or_else(|| AppError::InvalidAmount(format!("cannot scale {amount}")))
}

/// Convert integer minor units back into a human amount. Exact.
pub fn format_units(minor: &BigUint, decimals: u8) -> BigDecimal {
    BigDecimal::new(BigInt::from(minor.clone()), i64::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parse_units_scales_and_truncates() {
        let amount = BigDecimal::from_str("1.23456").unwrap();
        assert_eq!(parse_units(&amount, 2).unwrap(), BigUint::from(123u32));
        assert_eq!(parse_units(&amount, 6).unwrap(), BigUint::from(1_234_560u32));

        let one = BigDecimal::from(1);
        assert_eq!(
            parse_units(&one, 18).unwrap(),
            BigUint::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parse_units_rejects_negative() {
        let amount = BigDecimal::from_str("-0.5").unwrap();
        assert!(matches!(
            parse_units(&amount, 18),
            Err(AppError::InvalidAmount(_))
        ));
    }

    #[test]
    fn format_units_is_exact() {
        let minor = BigUint::from(1_993_998_011_983_982_051u64);
        let human = format_units(&minor, 18);
        assert_eq!(human, BigDecimal::from_str("1.993998011983982051").unwrap());
        assert_eq!(parse_units(&human, 18).unwrap(), minor);
    }
}
