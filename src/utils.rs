//! Utility functions and type conversions for on-chain data.
//!
//! This module bridges the integer types returned by contract calls (`alloy`'s
//! fixed-width `Uint`s) and the arbitrary-precision types the pricing engine works
//! with (`BigUint`, `BigRational`), parses addresses from user input, and renders
//! exact rates as decimal strings for display.

use crate::errors::{Result, UtilityError};
use alloy::primitives::{Address, U256};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::str::FromStr;

/// Parse a string representation of an Ethereum address.
///
/// Accepts addresses with or without the "0x" prefix. The address must be exactly
/// 20 bytes (40 hex characters).
///
/// # Errors
///
/// Returns an error if the string contains invalid hex characters or has the
/// wrong length.
pub fn string_to_h160(s: &str) -> Result<Address> {
    Address::from_str(s.trim().trim_start_matches("0x"))
        .map_err(|source| UtilityError::AddressParsingFailed {
            input: s.to_string(),
            source: alloy::primitives::AddressError::Hex(source),
        }.into())
}

/// Parse a comma-separated list of addresses, ignoring empty entries.
pub fn parse_address_list(s: &str) -> Result<Vec<Address>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(string_to_h160)
        .collect()
}

/// Convert a U256 value to a BigUint.
pub fn u256_to_biguint(val: U256) -> BigUint {
    BigUint::from_bytes_be(&val.to_be_bytes::<32>())
}

/// Render a non-negative rational as a decimal string with `precision` fractional
/// digits, truncating the remainder.
///
/// Negative values never occur in the engine; they are rendered by magnitude with a
/// leading minus sign so the function stays total.
pub fn format_rate(rate: &BigRational, precision: usize) -> String {
    let sign = if rate.is_negative() { "-" } else { "" };
    let magnitude = rate.abs();

    let scale = BigInt::from(10u32).pow(precision as u32);
    let scaled = (magnitude.numer() * &scale) / magnitude.denom();
    let integer_part = &scaled / &scale;
    let fractional_part = &scaled % &scale;

    if precision == 0 {
        return format!("{sign}{integer_part}");
    }

    format!(
        "{sign}{integer_part}.{fractional:0>width$}",
        fractional = fractional_part.to_string(),
        width = precision
    )
}

/// Build a rational from two unsigned integers.
///
/// Returns `None` when the denominator is zero instead of panicking the way
/// `BigRational::new` does.
pub fn ratio(numerator: &BigUint, denominator: &BigUint) -> Option<BigRational> {
    if denominator.is_zero() {
        return None;
    }
    Some(BigRational::new(
        BigInt::from(numerator.clone()),
        BigInt::from(denominator.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_h160_accepts_prefix_and_bare() {
        let with_prefix = string_to_h160("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        let bare = string_to_h160("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
        assert_eq!(with_prefix, bare);
    }

    #[test]
    fn test_string_to_h160_rejects_garbage() {
        assert!(string_to_h160("0x1234").is_err());
        assert!(string_to_h160("not-an-address").is_err());
    }

    #[test]
    fn test_parse_address_list_skips_empty_entries() {
        let list = parse_address_list(
            "0x0000000000000000000000000000000000000001, ,0x0000000000000000000000000000000000000002,",
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], Address::with_last_byte(1));
        assert_eq!(list[1], Address::with_last_byte(2));
    }

    #[test]
    fn test_u256_to_biguint() {
        let value = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(u256_to_biguint(value), BigUint::from(1_000_000_000_000_000_000u128));
        assert_eq!(u256_to_biguint(U256::ZERO), BigUint::zero());
    }

    #[test]
    fn test_format_rate() {
        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        assert_eq!(format_rate(&half, 4), "0.5000");

        let third = BigRational::new(BigInt::from(10), BigInt::from(3));
        assert_eq!(format_rate(&third, 3), "3.333");
        assert_eq!(format_rate(&third, 0), "3");

        let tiny = BigRational::new(BigInt::from(1), BigInt::from(1_000_000));
        assert_eq!(format_rate(&tiny, 8), "0.00000100");
    }

    #[test]
    fn test_ratio_rejects_zero_denominator() {
        assert!(ratio(&BigUint::from(1u32), &BigUint::zero()).is_none());
        let two = ratio(&BigUint::from(4u32), &BigUint::from(2u32)).unwrap();
        assert_eq!(two, BigRational::from_integer(BigInt::from(2)));
    }
}
