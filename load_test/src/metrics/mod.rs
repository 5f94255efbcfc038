//! Statistics collected while virtual users run

pub mod collector;
pub mod reporter;
pub mod types;

pub use collector::{LatencyStats, MetricsCollector};
pub use types::TestMetrics;
