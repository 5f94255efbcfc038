//! Virtual user runtime
//!
//! A [`Task`] is one unit of repeatable work. The [`swarm::Swarm`] hands each
//! virtual user its own [`UserClient`] and runs the task in a loop, pausing
//! for a random [`WaitTime`] between iterations.
//!
//! Tasks classify outcomes themselves: [`UserClient::post_json`] always
//! returns a [`CapturedResponse`] (transport errors included) and nothing is
//! counted until the task hands it back through [`UserClient::record`].

mod response;
pub mod swarm;

pub use response::CapturedResponse;
pub use swarm::{Swarm, SwarmOptions};

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;

use crate::error::ConfigError;
use crate::metrics::MetricsCollector;
use crate::transport::Transport;

/// Repeatable unit of work executed by every virtual user.
#[async_trait]
pub trait Task: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn execute(&self, client: &UserClient);
}

/// Per-user handle onto the transport and the statistics collector.
#[derive(Clone)]
pub struct UserClient {
    user_id: usize,
    transport: Arc<dyn Transport>,
    collector: MetricsCollector,
}

impl UserClient {
    pub fn new(user_id: usize, transport: Arc<dyn Transport>, collector: MetricsCollector) -> Self {
        Self {
            user_id,
            transport,
            collector,
        }
    }

    pub fn user_id(&self) -> usize {
        self.user_id
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    /// POST a JSON body and capture the result for manual classification.
    ///
    /// Never fails: a request that produced no response comes back with
    /// status `0` and the error text as body.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> CapturedResponse {
        let start = Instant::now();
        let result = self.transport.post(path, body, headers).await;
        let elapsed = start.elapsed();

        match result {
            Ok(raw) => CapturedResponse::new(path, raw.status, raw.body, elapsed),
            Err(e) => {
                tracing::debug!(user = self.user_id, "POST {} produced no response: {}", path, e);
                CapturedResponse::new(path, 0, e.to_string(), elapsed)
            }
        }
    }

    /// Emit one success or failure to the statistics collector.
    pub fn record(&self, response: CapturedResponse) {
        let latency_ms = response.elapsed().as_millis() as u64;
        match response.failure_message() {
            Some(message) => {
                tracing::debug!(
                    user = self.user_id,
                    request = response.name(),
                    "Request failed: {}",
                    message
                );
                self.collector.request_failed(latency_ms, message);
            }
            None => self.collector.request_succeeded(latency_ms),
        }
    }
}

/// Random pause inserted between consecutive task executions.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitTime {
    range: RangeInclusive<Duration>,
}

impl WaitTime {
    /// Uniform wait between `min_secs` and `max_secs`, both inclusive.
    pub fn between(min_secs: f64, max_secs: f64) -> Result<Self, ConfigError> {
        let valid = min_secs.is_finite()
            && max_secs.is_finite()
            && min_secs >= 0.0
            && min_secs <= max_secs;
        if !valid {
            return Err(ConfigError::InvalidWait {
                min: min_secs,
                max: max_secs,
            });
        }

        let invalid = || ConfigError::InvalidWait {
            min: min_secs,
            max: max_secs,
        };
        let min = Duration::try_from_secs_f64(min_secs).map_err(|_| invalid())?;
        let max = Duration::try_from_secs_f64(max_secs).map_err(|_| invalid())?;

        Ok(Self { range: min..=max })
    }

    /// No pause at all between iterations.
    pub fn none() -> Self {
        Self {
            range: Duration::ZERO..=Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        *self.range.start()
    }

    pub fn max(&self) -> Duration {
        *self.range.end()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min() == self.max() {
            return self.min();
        }
        rng.gen_range(self.range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_wait_time_rejects_inverted_bounds() {
        let err = WaitTime::between(5.0, 1.0).expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidWait { .. }));
    }

    #[test]
    fn test_wait_time_rejects_negative_and_nan() {
        assert!(WaitTime::between(-1.0, 1.0).is_err());
        assert!(WaitTime::between(0.0, f64::NAN).is_err());
        assert!(WaitTime::between(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_wait_time_rejects_unrepresentable_duration() {
        let err = WaitTime::between(0.0, 1e30).expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidWait { .. }));
    }

    #[test]
    fn test_wait_time_samples_very_long_bounds() {
        // Beyond u64 nanoseconds
        let wait = WaitTime::between(1e12, 2e12).unwrap();
        let pause = wait.sample(&mut StdRng::seed_from_u64(3));
        assert!(pause >= Duration::from_secs(1_000_000_000_000));
        assert!(pause <= Duration::from_secs(2_000_000_000_000));
    }

    #[test]
    fn test_wait_time_samples_within_bounds() {
        let wait = WaitTime::between(1.0, 5.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let pause = wait.sample(&mut rng);
            assert!(pause >= Duration::from_secs(1));
            assert!(pause <= Duration::from_secs(5));
        }
    }

    #[test]
    fn test_fixed_wait_time() {
        let wait = WaitTime::between(2.0, 2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(wait.sample(&mut rng), Duration::from_secs(2));
        assert_eq!(WaitTime::none().sample(&mut rng), Duration::ZERO);
    }
}
