//! Resolved run configuration
//!
//! Command-line arguments are validated once here so the scenario only ever
//! sees a runnable [`LoadTestConfig`].

mod user_profiles;

pub use user_profiles::{get_user_profile, UserProfile};

use std::time::Duration;

use reqwest::Url;

use crate::cli::RunArgs;
use crate::error::ConfigError;
use crate::runtime::{SwarmOptions, WaitTime};
use crate::scenarios::login_attempt::PayloadRanges;
use crate::transport::HttpOptions;

#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub host: Url,
    pub path: String,
    pub swarm: SwarmOptions,
    /// `None` runs until Ctrl+C
    pub run_time: Option<Duration>,
    pub http: HttpOptions,
    pub ranges: PayloadRanges,
    /// Live view refresh in seconds, 0 when disabled
    pub report_interval: u64,
}

impl LoadTestConfig {
    pub fn from_args(args: &RunArgs) -> Result<Self, ConfigError> {
        let host = Url::parse(&args.host).map_err(|source| ConfigError::InvalidHost {
            host: args.host.clone(),
            source,
        })?;

        let profile = get_user_profile(&args.profile);
        let swarm = SwarmOptions {
            users: args.users.unwrap_or(profile.users),
            spawn_rate: args.spawn_rate.unwrap_or(profile.spawn_rate),
            wait: WaitTime::between(args.min_wait, args.max_wait)?,
        };
        swarm.validate()?;

        Ok(Self {
            host,
            path: args.path.clone(),
            swarm,
            run_time: (args.run_time > 0).then(|| Duration::from_secs(args.run_time)),
            http: HttpOptions {
                verify_tls: args.verify_tls,
                timeout: Duration::from_secs(args.timeout),
            },
            ranges: PayloadRanges::default(),
            report_interval: args.report_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Mode};
    use crate::scenarios::login_attempt::LOGIN_ATTEMPT_PATH;
    use clap::Parser;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["load-test", "run"];
        argv.extend_from_slice(extra);
        let mut args = match Cli::try_parse_from(argv).unwrap().mode {
            Mode::Run(args) => args,
            Mode::Sample(_) => panic!("expected run mode"),
        };
        // Undo LOAD_TEST_* values picked up from the environment
        if !extra.contains(&"--host") {
            args.host = "http://localhost:8000".to_string();
        }
        if !extra.contains(&"--path") {
            args.path = LOGIN_ATTEMPT_PATH.to_string();
        }
        if !extra.contains(&"--users") {
            args.users = None;
        }
        args
    }

    #[test]
    fn test_profile_defaults_apply() {
        let config = LoadTestConfig::from_args(&run_args(&["--profile", "stress"])).unwrap();
        assert_eq!(config.swarm.users, 500);
        assert_eq!(config.swarm.spawn_rate, 25.0);
        assert_eq!(config.run_time, Some(Duration::from_secs(60)));
        assert!(!config.http.verify_tls);
    }

    #[test]
    fn test_explicit_values_override_profile() {
        let config = LoadTestConfig::from_args(&run_args(&[
            "--profile", "stress", "--users", "3", "--spawn-rate", "0.5", "--run-time", "0",
            "--verify-tls",
        ]))
        .unwrap();
        assert_eq!(config.swarm.users, 3);
        assert_eq!(config.swarm.spawn_rate, 0.5);
        assert_eq!(config.run_time, None);
        assert!(config.http.verify_tls);
    }

    #[test]
    fn test_wait_bounds_are_carried() {
        let config =
            LoadTestConfig::from_args(&run_args(&["--min-wait", "0.5", "--max-wait", "2"])).unwrap();
        assert_eq!(config.swarm.wait.min(), Duration::from_millis(500));
        assert_eq!(config.swarm.wait.max(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let err = LoadTestConfig::from_args(&run_args(&["--host", "not-a-url"]))
            .expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }

    #[test]
    fn test_inverted_wait_is_rejected() {
        let err = LoadTestConfig::from_args(&run_args(&["--min-wait", "5", "--max-wait", "1"]))
            .expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidWait { .. }));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let err = LoadTestConfig::from_args(&run_args(&["--max-wait", "1e30"]))
            .expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidWait { .. }));

        let err = LoadTestConfig::from_args(&run_args(&["--spawn-rate", "1e-300"]))
            .expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidSpawnRate(_)));
    }

    #[test]
    fn test_zero_users_is_rejected() {
        let err = LoadTestConfig::from_args(&run_args(&["--users", "0"])).expect_err("expected error");
        assert!(matches!(err, ConfigError::NoUsers));
    }
}
