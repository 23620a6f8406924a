//! AMM Hop Router Library
//!
//! Finds the best exchange rate between two assets across constant-product liquidity
//! pools, either through their direct pool or through a chain of up to five pools.
//!
//! # Architecture Overview
//!
//! - **`router`**: Direct quotes and the hop-bounded best-rate search
//! - **`pricing`**: Decimal normalization and per-hop marginal pricing
//! - **`graph`**: Asset graph over the candidate pools of one search
//! - **`providers`**: Collaborator traits plus on-chain and in-memory implementations
//! - **`context`**: Cancellation and deadlines for one computation
//! - **`config`**: Environment-based configuration and validation
//! - **`builders`**: Builder patterns for graphs and routers
//! - **`errors`**: Error handling and reporting
//! - **`utils`**: Address parsing and numeric conversions
//!
//! # Core Concepts
//!
//! - **Marginal Rate**: Output units per input unit at a pool's current reserve ratio,
//!   ignoring fees and price impact
//! - **Hop**: One conversion through one pool; a route of `n` hops visits `n + 1` assets
//! - **Reserve Cache**: A per-search snapshot of every pool reserve the search may use,
//!   fetched concurrently before the search runs
//!
//! # Thread Safety
//!
//! `Router` is `Send + Sync` and cheap to clone; concurrent searches share
//! collaborators but nothing else.

pub mod builders;
pub mod config;
pub mod context;
pub mod errors;
pub mod graph;
pub mod pricing;
pub mod providers;
pub mod router;
pub mod utils;

// Re-export the main Result type and error enum for convenience
pub use errors::{Result, RouterError};

// Re-export builder patterns for convenience
pub use builders::{AssetGraphBuilder, RouterBuilder};

pub use config::RouterConfig;
pub use context::QuoteContext;
pub use router::{RouteResult, RouteSummary, Router, MAX_HOPS};

// Module-specific result types for better ergonomics
pub type GraphResult<T> = std::result::Result<T, errors::GraphError>;
pub type PricingResult<T> = std::result::Result<T, errors::PricingError>;
pub type ProviderResult<T> = std::result::Result<T, errors::ProviderError>;
pub type UtilityResult<T> = std::result::Result<T, errors::UtilityError>;
