//! Swarm - spawns virtual users and keeps them looping until shutdown

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{interval, Duration};

use super::{Task, UserClient, WaitTime};
use crate::error::ConfigError;
use crate::metrics::MetricsCollector;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct SwarmOptions {
    /// Number of concurrent virtual users
    pub users: usize,
    /// Users started per second while ramping up
    pub spawn_rate: f64,
    /// Pause between two task executions of the same user
    pub wait: WaitTime,
}

impl SwarmOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users == 0 {
            return Err(ConfigError::NoUsers);
        }
        self.spawn_period()?;
        Ok(())
    }

    /// Delay between two user starts, floored at 1ms because `interval()`
    /// panics on a zero period.
    pub fn spawn_period(&self) -> Result<Duration, ConfigError> {
        if !self.spawn_rate.is_finite() || self.spawn_rate <= 0.0 {
            return Err(ConfigError::InvalidSpawnRate(self.spawn_rate));
        }
        Duration::try_from_secs_f64(1.0 / self.spawn_rate)
            .map(|period| period.max(Duration::from_millis(1)))
            .map_err(|_| ConfigError::InvalidSpawnRate(self.spawn_rate))
    }
}

/// Set of virtual users sharing one transport, one task and one collector.
pub struct Swarm {
    transport: Arc<dyn Transport>,
    task: Arc<dyn Task>,
    collector: MetricsCollector,
    options: SwarmOptions,
    spawn_period: Duration,
}

impl Swarm {
    pub fn new(
        transport: Arc<dyn Transport>,
        task: Arc<dyn Task>,
        collector: MetricsCollector,
        options: SwarmOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let spawn_period = options.spawn_period()?;
        Ok(Self {
            transport,
            task,
            collector,
            options,
            spawn_period,
        })
    }

    /// Ramp up to the configured user count and run until `shutdown`
    /// resolves, then stop every user and wait for them to exit.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut users = JoinSet::new();

        tokio::pin!(shutdown);

        let stopped_during_ramp = tokio::select! {
            _ = self.spawn_users(&mut users, &stop_rx) => false,
            _ = &mut shutdown => true,
        };

        if !stopped_during_ramp {
            tracing::info!("All {} virtual users spawned", self.options.users);
            (&mut shutdown).await;
        }

        tracing::info!("Stopping {} virtual users...", users.len());
        let _ = stop_tx.send(true);

        while let Some(result) = users.join_next().await {
            if let Err(e) = result {
                tracing::error!("Virtual user task panicked: {}", e);
            }
        }

        tracing::info!("All virtual users stopped");
    }

    async fn spawn_users(&self, users: &mut JoinSet<()>, stop_rx: &watch::Receiver<bool>) {
        let mut ticker = interval(self.spawn_period);

        for user_id in 0..self.options.users {
            ticker.tick().await;

            let client = UserClient::new(user_id, self.transport.clone(), self.collector.clone());
            users.spawn(run_user(
                client,
                self.task.clone(),
                self.options.wait.clone(),
                stop_rx.clone(),
            ));

            if (user_id + 1) % 100 == 0 {
                tracing::info!("Spawned {}/{} virtual users", user_id + 1, self.options.users);
            }
        }
    }
}

async fn run_user(
    client: UserClient,
    task: Arc<dyn Task>,
    wait: WaitTime,
    mut stop: watch::Receiver<bool>,
) {
    let _active = ActiveUser::start(&client);
    tracing::debug!(user = client.user_id(), "Virtual user started ({})", task.name());

    loop {
        if *stop.borrow() {
            break;
        }

        tokio::select! {
            _ = task.execute(&client) => {}
            _ = stop.changed() => break,
        }

        let pause = wait.sample(&mut rand::thread_rng());
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = stop.changed() => break,
        }
    }
}

/// Counts a user as active for as long as it lives, panics included.
struct ActiveUser<'a> {
    client: &'a UserClient,
}

impl<'a> ActiveUser<'a> {
    fn start(client: &'a UserClient) -> Self {
        client.collector().user_started();
        Self { client }
    }
}

impl Drop for ActiveUser<'_> {
    fn drop(&mut self) {
        self.client.collector().user_stopped();
        tracing::debug!(user = self.client.user_id(), "Virtual user stopped");
    }
}
