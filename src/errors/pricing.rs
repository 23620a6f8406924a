//! Decimal normalization and hop pricing errors.

/// Errors that can occur while turning reserves into a rate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Division by zero: input reserve is empty")]
    DivisionByZero,

    #[error("Unsupported decimal precision {decimals}: at most {max} is supported")]
    DecimalsOutOfRange { decimals: u8, max: u8 },
}
