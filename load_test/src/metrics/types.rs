//! Metric types

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    pub sent: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RequestMetrics {
    /// Percentage of completed requests classified as successful.
    pub fn success_rate(&self) -> Option<f64> {
        if self.sent == 0 {
            None
        } else {
            Some(self.succeeded as f64 / self.sent as f64 * 100.0)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserMetrics {
    pub spawned: usize,
    pub active: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TestMetrics {
    pub requests: RequestMetrics,
    pub users: UserMetrics,
    pub system: SystemMetrics,
    /// Failure message -> occurrences
    pub failures: BTreeMap<String, usize>,
    /// Free-form counters (service verdicts and the like)
    pub tallies: BTreeMap<String, usize>,
}
