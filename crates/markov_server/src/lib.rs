//! REST API server for the markov_core credit-transition engine
//!
//! Exposes matrix estimation, stationary distributions, expected loss and
//! stress scenarios as JSON endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

// Re-export the engine for integration
pub use markov_core;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
