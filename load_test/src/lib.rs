//! Login attempt load generator
//!
//! Drives randomized login attempts against the phishing detection service's
//! `/api/login-attempt` endpoint from many concurrent virtual users and
//! reports pass/fail statistics.

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod scenarios;
pub mod transport;

pub use config::LoadTestConfig;
pub use error::ConfigError;
