//! Asset graph construction and lookup errors.

use alloy::primitives::Address;

/// Errors that can occur during graph operations
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Asset not found in graph: {address}")]
    AssetNotFound { address: Address },

    #[error("Invalid asset index: {index}")]
    InvalidAssetIndex { index: usize },

    #[error("Pool {pool} pairs asset {asset} with itself")]
    DegeneratePool { pool: Address, asset: Address },

    #[error("Graph builder is missing the {role} asset")]
    MissingEndpoint { role: &'static str },
}
