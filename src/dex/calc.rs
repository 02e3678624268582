use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::Result;
use crate::utils::{format_units, parse_units};

/// Fee-adjusted multiplier per 1000 units of input (0.3% pool fee).
const FEE_MULTIPLIER: u32 = 997;
const NO_FEE_MULTIPLIER: u32 = 1000;

fn input_multiplier(apply_fee: bool) -> BigUint {
    BigUint::from(if apply_fee {
        FEE_MULTIPLIER
    } else {
        NO_FEE_MULTIPLIER
    })
}

/// Output of a constant-product swap for a given input, in minor units.
///
/// Mirrors the pair contract exactly: the result is floored, so it never
/// exceeds what the pool would actually pay out. An empty input sold into an
/// empty reserve yields zero.
pub fn get_amount_out(
    amount_in: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    apply_fee: bool,
) -> BigUint {
    let amount_in_with_fee = amount_in * input_multiplier(apply_fee);
    let numerator = &amount_in_with_fee * reserve_out;
    let denominator = reserve_in * BigUint::from(NO_FEE_MULTIPLIER) + amount_in_with_fee;
    if denominator.is_zero() {
        return BigUint::zero();
    }
    numerator / denominator
}

/// Input required to receive `amount_out` from a constant-product pool, in
/// minor units. Rounded up by one unit so the pool invariant holds after
/// the swap.
///
/// # Panics
///
/// Panics if `amount_out >= reserve_out`. Callers filter such pools out
/// before asking; reaching this is a routing bug.
pub fn get_amount_in(
    amount_out: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    apply_fee: bool,
) -> BigUint {
    assert!(
        amount_out < reserve_out,
        "amount_out {amount_out} must be below reserve_out {reserve_out}"
    );
    let numerator = reserve_in * amount_out * BigUint::from(NO_FEE_MULTIPLIER);
    let denominator = (reserve_out - amount_out) * input_multiplier(apply_fee);
    numerator / denominator + 1u32
}

/// Human-unit wrapper around [`get_amount_out`].
///
/// `amount_in` is scaled by `dec_in`, the floored result is scaled back by
/// `dec_out`.
pub fn compute_amount_out(
    amount_in: &BigDecimal,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    dec_in: u8,
    dec_out: u8,
    apply_fee: bool,
) -> Result<BigDecimal> {
    let amount_in = parse_units(amount_in, dec_in)?;
    let amount_out = get_amount_out(&amount_in, reserve_in, reserve_out, apply_fee);
    Ok(format_units(&amount_out, dec_out))
}

/// Human-unit wrapper around [`get_amount_in`].
///
/// `amount_out` is scaled by `dec_out`, the required input is scaled back by
/// `dec_in`.
///
/// # Panics
///
/// Panics under the same condition as [`get_amount_in`].
pub fn compute_amount_in(
    amount_out: &BigDecimal,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    dec_in: u8,
    dec_out: u8,
    apply_fee: bool,
) -> Result<BigDecimal> {
    let amount_out = parse_units(amount_out, dec_out)?;
    let amount_in = get_amount_in(&amount_out, reserve_in, reserve_out, apply_fee);
    Ok(format_units(&amount_in, dec_in))
}
