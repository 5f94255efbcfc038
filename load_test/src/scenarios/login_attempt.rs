//! Login attempt scenario - randomized login attempts against the phishing
//! detection endpoint
//!
//! Every execution builds a fresh [`LoginAttemptPayload`], POSTs it once and
//! marks the captured response as failed unless the service answered 200.
//! Nothing carries over between executions.

use std::ops::RangeInclusive;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::verdict::LoginVerdict;
use crate::config::LoadTestConfig;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::runtime::{Swarm, Task, UserClient};
use crate::transport::{HttpTransport, JSON_CONTENT_TYPE};

/// Endpoint receiving login attempts.
pub const LOGIN_ATTEMPT_PATH: &str = "/api/login-attempt";

pub static LOCATIONS: [&str; 10] = [
    "New York, USA",
    "London, UK",
    "Berlin, Germany",
    "Tokyo, Japan",
    "Sydney, Australia",
    "Cape Town, South Africa",
    "Nairobi, Kenya",
    "Lagos, Nigeria",
    "Cairo, Egypt",
    "Accra, Ghana",
];

pub static USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Mobile Safari/537.36",
];

/// Numeric ranges used to fill the payload templates. All inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRanges {
    pub user_id: RangeInclusive<u32>,
    pub device_id: RangeInclusive<u32>,
    pub otp_code_hash: RangeInclusive<u32>,
    /// First and fourth octet
    pub outer_octet: RangeInclusive<u8>,
    /// Second and third octet
    pub inner_octet: RangeInclusive<u8>,
}

impl Default for PayloadRanges {
    fn default() -> Self {
        Self {
            user_id: 1..=100,
            device_id: 1..=50,
            otp_code_hash: 1000..=9999,
            outer_octet: 1..=255,
            inner_octet: 0..=255,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttemptPayload {
    pub user_id: String,
    pub ip_address: String,
    pub device_id: String,
    pub location: String,
    pub user_agent: String,
    pub otp_code_hash: String,
}

impl LoginAttemptPayload {
    /// Draw every field independently and uniformly.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, ranges: &PayloadRanges) -> Self {
        let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
        let user_agent = USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())];

        let ip_address = format!(
            "{}.{}.{}.{}",
            rng.gen_range(ranges.outer_octet.clone()),
            rng.gen_range(ranges.inner_octet.clone()),
            rng.gen_range(ranges.inner_octet.clone()),
            rng.gen_range(ranges.outer_octet.clone()),
        );

        Self {
            user_id: format!("user_{}", rng.gen_range(ranges.user_id.clone())),
            ip_address,
            device_id: format!("device_{}", rng.gen_range(ranges.device_id.clone())),
            location: location.to_string(),
            user_agent: user_agent.to_string(),
            otp_code_hash: format!("hash_{}", rng.gen_range(ranges.otp_code_hash.clone())),
        }
    }
}

/// Generate `count` payloads without sending them. The same `seed` always
/// yields the same payloads; `None` seeds from the OS.
pub fn sample_payloads(
    count: usize,
    seed: Option<u64>,
    ranges: &PayloadRanges,
) -> Vec<LoginAttemptPayload> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..count)
        .map(|_| LoginAttemptPayload::generate(&mut rng, ranges))
        .collect()
}

/// The "login attempt" task executed by every virtual user.
#[derive(Debug, Clone)]
pub struct LoginAttemptTask {
    path: String,
    ranges: PayloadRanges,
}

impl Default for LoginAttemptTask {
    fn default() -> Self {
        Self::new(LOGIN_ATTEMPT_PATH, PayloadRanges::default())
    }
}

impl LoginAttemptTask {
    pub fn new(path: impl Into<String>, ranges: PayloadRanges) -> Self {
        Self {
            path: path.into(),
            ranges,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Send one randomized login attempt and record its outcome.
    ///
    /// Never returns an error: anything other than a 200, including a request
    /// that got no response at all, is recorded as a failure.
    pub async fn simulate_login_attempt(&self, client: &UserClient) {
        let payload = LoginAttemptPayload::generate(&mut rand::thread_rng(), &self.ranges);
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to serialize login attempt payload: {}", e);
                return;
            }
        };

        let headers = [("Content-Type", JSON_CONTENT_TYPE)];
        let mut response = client.post_json(&self.path, &body, &headers).await;

        if response.status() != 200 {
            let message = format!(
                "Login attempt failed. Status Code: {}, Response: {}",
                response.status(),
                response.text()
            );
            response.failure(message);
        } else if let Some(verdict) = LoginVerdict::parse(response.text()) {
            for label in verdict.labels() {
                client.collector().tally(label);
            }
        }

        client.record(response);
    }
}

#[async_trait]
impl Task for LoginAttemptTask {
    fn name(&self) -> &str {
        "simulate_login_attempt"
    }

    async fn execute(&self, client: &UserClient) {
        self.simulate_login_attempt(client).await;
    }
}

/// Run the login attempt swarm described by `config` and print the report.
pub async fn run(config: LoadTestConfig) -> Result<()> {
    tracing::info!("Starting login attempt scenario");

    let transport = HttpTransport::new(config.host.clone(), &config.http)?;
    let target = transport.url_for(&config.path)?;
    let task = LoginAttemptTask::new(config.path.clone(), config.ranges.clone());

    // Setup metrics collector
    let collector = MetricsCollector::new();

    // Start periodic metrics reporter
    let live_reporter = (config.report_interval > 0).then(|| {
        let collector_clone = collector.clone();
        let interval_secs = config.report_interval;
        tokio::spawn(async move {
            reporter::start_periodic_reporter(collector_clone, interval_secs).await;
        })
    });

    let swarm = Swarm::new(
        Arc::new(transport),
        Arc::new(task),
        collector.clone(),
        config.swarm.clone(),
    )?;

    tracing::info!(
        "Spawning {} users at {}/sec against {}",
        config.swarm.users,
        config.swarm.spawn_rate,
        target
    );

    let run_time = config.run_time;
    swarm
        .run(async move {
            match run_time {
                Some(limit) => {
                    tokio::select! {
                        _ = tokio::time::sleep(limit) => {
                            tracing::info!("Run time of {}s reached", limit.as_secs());
                        }
                        _ = shutdown_signal() => {}
                    }
                }
                None => shutdown_signal().await,
            }
        })
        .await;

    if let Some(handle) = live_reporter {
        handle.abort();
    }

    // Print final report
    reporter::print_final_report(&collector);

    let failures = collector.failure_count();
    if failures > 0 {
        tracing::warn!("{} login attempts failed", failures);
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl+C received, stopping load test"),
        Err(e) => {
            // Without a signal handler the run can only end on its deadline
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
