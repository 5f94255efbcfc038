//! Virtual users driven by the swarm against an in-memory service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use login_load_test::metrics::MetricsCollector;
use login_load_test::runtime::{Swarm, SwarmOptions, Task, UserClient, WaitTime};
use login_load_test::scenarios::login_attempt::LoginAttemptTask;
use login_load_test::transport::{RawResponse, RequestError, Transport};
use serde_json::Value;

struct CountingTransport {
    status: u16,
    calls: AtomicUsize,
}

impl CountingTransport {
    fn new(status: u16) -> Self {
        Self {
            status,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn post(
        &self,
        _path: &str,
        _body: &Value,
        _headers: &[(&str, &str)],
    ) -> Result<RawResponse, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawResponse::new(self.status, "server error"))
    }
}

struct PanickingTask;

#[async_trait]
impl Task for PanickingTask {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn execute(&self, _client: &UserClient) {
        panic!("task blew up");
    }
}

fn options(users: usize, spawn_rate: f64, wait_secs: f64) -> SwarmOptions {
    SwarmOptions {
        users,
        spawn_rate,
        wait: WaitTime::between(wait_secs, wait_secs).unwrap(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_users_loop_until_shutdown() {
    let transport = Arc::new(CountingTransport::new(200));
    let collector = MetricsCollector::new();
    let swarm = Swarm::new(
        transport.clone(),
        Arc::new(LoginAttemptTask::default()),
        collector.clone(),
        options(3, 10.0, 1.0),
    )
    .unwrap();

    swarm.run(tokio::time::sleep(Duration::from_secs(10))).await;

    let snapshot = collector.get_snapshot();
    assert_eq!(snapshot.users.spawned, 3);
    assert_eq!(snapshot.users.active, 0);
    assert!(snapshot.requests.sent >= 3 * 5, "only {} requests", snapshot.requests.sent);
    assert_eq!(snapshot.requests.failed, 0);
    assert_eq!(transport.calls(), snapshot.requests.sent);
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_stop_users() {
    let transport = Arc::new(CountingTransport::new(500));
    let collector = MetricsCollector::new();
    let swarm = Swarm::new(
        transport.clone(),
        Arc::new(LoginAttemptTask::default()),
        collector.clone(),
        options(2, 2.0, 1.0),
    )
    .unwrap();

    swarm.run(tokio::time::sleep(Duration::from_secs(5))).await;

    let snapshot = collector.get_snapshot();
    assert!(snapshot.requests.failed > 2);
    assert_eq!(snapshot.requests.succeeded, 0);
    assert_eq!(snapshot.failures.len(), 1);
    assert_eq!(snapshot.failures.values().sum::<usize>(), snapshot.requests.failed);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_ramp_up_stops_spawned_users() {
    let transport = Arc::new(CountingTransport::new(200));
    let collector = MetricsCollector::new();
    let swarm = Swarm::new(
        transport,
        Arc::new(LoginAttemptTask::default()),
        collector.clone(),
        options(100, 1.0, 1.0),
    )
    .unwrap();

    swarm.run(tokio::time::sleep(Duration::from_millis(5500))).await;

    let users = collector.get_snapshot().users;
    assert!(users.spawned > 0 && users.spawned < 100, "spawned {}", users.spawned);
    assert_eq!(users.active, 0);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_user_does_not_abort_the_run() {
    let collector = MetricsCollector::new();
    let swarm = Swarm::new(
        Arc::new(CountingTransport::new(200)),
        Arc::new(PanickingTask),
        collector.clone(),
        options(2, 10.0, 0.0),
    )
    .unwrap();

    swarm.run(tokio::time::sleep(Duration::from_secs(1))).await;

    let users = collector.get_snapshot().users;
    assert_eq!(users.spawned, 2);
    assert_eq!(users.active, 0);
}
