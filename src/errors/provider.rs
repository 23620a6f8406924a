//! Errors surfaced by the external collaborators.

use alloy::primitives::Address;

/// Errors that can occur while talking to pool, reserve and decimals sources
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No pool exists for pair {asset_a} / {asset_b}")]
    PairNotFound { asset_a: Address, asset_b: Address },

    #[error("RPC call {method} on {target} failed: {message}")]
    Rpc {
        method: &'static str,
        target: Address,
        message: String,
    },

    #[error("Failed to decode {method} response from {target}: {message}")]
    Decode {
        method: &'static str,
        target: Address,
        message: String,
    },

    #[error("No reserves known for pool {pool}")]
    UnknownPool { pool: Address },

    #[error("No decimals known for asset {asset}")]
    UnknownAsset { asset: Address },

    #[error("Computation cancelled")]
    Cancelled,

    #[error("Computation deadline of {timeout_ms} ms exceeded")]
    DeadlineExceeded { timeout_ms: u64 },
}
