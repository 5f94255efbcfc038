//! Setup errors for the load generator.
//!
//! Per-request problems never show up here: they are folded into a captured
//! response and classified like any other non-200 outcome.

use thiserror::Error;

/// Errors raised while turning command-line arguments into a runnable test.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target host is not an absolute URL
    #[error("Invalid host '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },

    /// Wait bounds are negative, not finite, or inverted
    #[error("Invalid wait interval: min={min}s max={max}s")]
    InvalidWait { min: f64, max: f64 },

    /// Spawn rate must be a positive number of users per second
    #[error("Invalid spawn rate: {0} users/sec")]
    InvalidSpawnRate(f64),

    /// A run needs at least one virtual user
    #[error("At least one virtual user is required")]
    NoUsers,

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
