//! Per-hop pricing for constant-reserve pools.
//!
//! Two pieces live here:
//!
//! - [`normalize`] rescales a raw amount denominated in an asset's native precision
//!   to the common 18-decimal scale, so reserves of different assets can be divided
//!   against each other.
//! - [`price`] turns a pool's two reserves into the marginal exchange rate, the
//!   number of output units one input unit buys at the current reserve ratio.
//!
//! # Approximation
//!
//! The rate is the *marginal* rate `reserve_out / reserve_in`. It ignores the pool
//! fee and the price impact a real trade of non-zero size has on a constant-product
//! curve. The router multiplies this fixed rate by the carried-forward amount, so a
//! quote is an upper bound on what an actual swap would return.

use crate::errors::PricingError;
use crate::utils::ratio;
use num_bigint::BigUint;
use num_rational::BigRational;

/// The common precision every amount is rescaled to.
pub const NORMALIZED_DECIMALS: u8 = 18;

/// Rescale `amount` from `decimals` fractional digits to 18.
///
/// Amounts already at 18 decimals are returned unchanged; everything else is
/// multiplied by `10^(18 - decimals)`. Scaling down is not supported: a precision
/// above 18 is reported as [`PricingError::DecimalsOutOfRange`].
pub fn normalize(amount: &BigUint, decimals: u8) -> Result<BigUint, PricingError> {
    if decimals == NORMALIZED_DECIMALS {
        return Ok(amount.clone());
    }
    if decimals > NORMALIZED_DECIMALS {
        return Err(PricingError::DecimalsOutOfRange {
            decimals,
            max: NORMALIZED_DECIMALS,
        });
    }

    let factor = BigUint::from(10u32).pow(u32::from(NORMALIZED_DECIMALS - decimals));
    Ok(amount * factor)
}

/// Marginal rate for converting the `reserve_in` asset into the `reserve_out` asset.
///
/// Both reserves are normalized to 18 decimals first, then divided exactly.
///
/// # Errors
///
/// - [`PricingError::DivisionByZero`] when `reserve_in` is zero. Callers treat this
///   as "no viable rate" rather than an infinite one.
/// - [`PricingError::DecimalsOutOfRange`] when either precision exceeds 18.
pub fn price(
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    decimals_in: u8,
    decimals_out: u8,
) -> Result<BigRational, PricingError> {
    let normalized_in = normalize(reserve_in, decimals_in)?;
    let normalized_out = normalize(reserve_out, decimals_out)?;

    ratio(&normalized_out, &normalized_in).ok_or(PricingError::DivisionByZero)
}
