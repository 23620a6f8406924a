//! Error handling and reporting for the routing engine.
//!
//! Errors are grouped by the component that raises them:
//!
//! - **`RouteError`**: input validation and search outcomes of the multi-hop router
//! - **`PricingError`**: decimal normalization and per-hop price calculation
//! - **`ProviderError`**: failures reported by the external collaborators (pool
//!   resolution, reserve and decimals reads) plus cancellation of a computation
//! - **`GraphError`**: asset graph construction and lookups
//! - **`UtilityError`**: address parsing and configuration loading
//!
//! `RouterError` wraps all of them with `#[from]` conversions, so every fallible
//! function in the crate can return the crate-wide [`Result`] and use `?` freely.
//! Callers that need to react to a specific condition (for example a missing pool)
//! match on the nested variant.

pub mod graph;
pub mod pricing;
pub mod provider;
pub mod route;
pub mod utility;

// Re-export all error types for convenience
pub use graph::GraphError;
pub use pricing::PricingError;
pub use provider::ProviderError;
pub use route::RouteError;
pub use utility::UtilityError;

/// Main result type for the library
pub type Result<T> = std::result::Result<T, RouterError>;

/// Top-level error enum that encompasses all possible errors in the routing library.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Invalid route request or a search that found nothing.
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// Normalization or price calculation failure.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Failure reported by an external collaborator, passed through unchanged.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Asset graph construction or lookup failure.
    #[error("Graph operation failed: {0}")]
    Graph(#[from] GraphError),

    /// Address parsing or configuration failure.
    #[error("Utility error: {0}")]
    Utility(#[from] UtilityError),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error for cases not covered by specific error types.
    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}

impl RouterError {
    /// Whether this error means the collaborators know no pool for a pair.
    ///
    /// Reserve cache population uses this to tell an absent edge apart from a
    /// failure that must abort the whole computation.
    pub fn is_pair_not_found(&self) -> bool {
        matches!(self, RouterError::Provider(ProviderError::PairNotFound { .. }))
    }

    /// Whether the computation was stopped by its cancellation token or deadline.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            RouterError::Provider(ProviderError::Cancelled)
                | RouterError::Provider(ProviderError::DeadlineExceeded { .. })
        )
    }
}
