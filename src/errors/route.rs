//! Route request validation and search outcome errors.

use alloy::primitives::Address;

/// Errors raised by the router before or after the search itself
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Source and destination are the same asset: {asset}")]
    SameAsset { asset: Address },

    #[error("Invalid hop count {requested}: must be between 1 and {max}")]
    InvalidHopCount { requested: usize, max: usize },

    #[error("No route from {source_asset} to {destination} within {max_hops} hops")]
    Unreachable {
        source_asset: Address,
        destination: Address,
        max_hops: usize,
    },
}
