//! Builder patterns for complex object construction.
//!
//! Builders offer a more ergonomic alternative to constructors with many parameters,
//! allowing step-by-step configuration with validation at build time.
//!
//! # Available Builders
//!
//! - **`AssetGraphBuilder`**: Builds the node set of a route search from candidate pools
//! - **`RouterBuilder`**: Wires a router from configuration, with on-chain collaborators
//!   by default
//!
//! # Design Principles
//!
//! - **Fluent Interface**: Method chaining for readable configuration
//! - **Immutability**: Builders consume themselves to prevent reuse after building
//! - **Flexibility**: Optional parameters with sensible defaults
//!
//! All build methods return `Result<T>` so missing or invalid settings surface as
//! regular errors.

pub mod graph;
pub mod router;

// Re-export builders for convenience
pub use graph::AssetGraphBuilder;
pub use router::RouterBuilder;
