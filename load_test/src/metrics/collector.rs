//! Metrics collector - thread-safe collection with latency tracking

use super::types::TestMetrics;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

/// Distinct failure messages kept before new ones are lumped together.
pub const MAX_DISTINCT_FAILURES: usize = 50;

/// Bucket for failure messages beyond [`MAX_DISTINCT_FAILURES`].
pub const OTHER_FAILURES: &str = "(other failures)";

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TestMetrics>>,
    request_latencies: Arc<RwLock<Histogram<u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // 3 significant digits is always a valid precision
        let request_hist =
            Histogram::new(3).expect("Failed to create request latency histogram");

        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TestMetrics::default())),
            request_latencies: Arc::new(RwLock::new(request_hist)),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn request_succeeded(&self, latency_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.requests.sent += 1;
        metrics.requests.succeeded += 1;
        drop(metrics);

        self.record_latency(latency_ms);
    }

    pub fn request_failed(&self, latency_ms: u64, message: &str) {
        let mut metrics = self.metrics.write();
        metrics.requests.sent += 1;
        metrics.requests.failed += 1;

        let key = if metrics.failures.contains_key(message)
            || metrics.failures.len() < MAX_DISTINCT_FAILURES
        {
            message.to_string()
        } else {
            OTHER_FAILURES.to_string()
        };
        *metrics.failures.entry(key).or_insert(0) += 1;
        drop(metrics);

        // Failed requests still took time on the wire
        self.record_latency(latency_ms);
    }

    pub fn user_started(&self) {
        let mut metrics = self.metrics.write();
        metrics.users.spawned += 1;
        metrics.users.active += 1;
    }

    pub fn user_stopped(&self) {
        let mut metrics = self.metrics.write();
        metrics.users.active = metrics.users.active.saturating_sub(1);
    }

    /// Bump a named counter.
    pub fn tally(&self, label: &str) {
        let mut metrics = self.metrics.write();
        *metrics.tallies.entry(label.to_string()).or_insert(0) += 1;
    }

    fn record_latency(&self, latency_ms: u64) {
        let mut hist = self.request_latencies.write();
        if let Err(e) = hist.record(latency_ms) {
            tracing::debug!("Failed to record latency {}ms: {}", latency_ms, e);
        }
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();
        metrics.system.cpu_usage = system.global_cpu_usage();
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TestMetrics {
        self.metrics.read().clone()
    }

    pub fn failure_count(&self) -> usize {
        self.metrics.read().requests.failed
    }

    pub fn get_latency_percentiles(&self) -> LatencyStats {
        let hist = self.request_latencies.read();
        LatencyStats {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
            count: hist.len(),
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}
