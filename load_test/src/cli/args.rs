use clap::{Args, Parser, Subcommand};

use crate::scenarios::login_attempt::LOGIN_ATTEMPT_PATH;

/// Login Attempt Load Testing Tool
#[derive(Parser, Debug)]
#[command(name = "load-test")]
#[command(about = "Drives randomized login attempts against the phishing detection service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Run virtual users against the target host (runs until the run time
    /// elapses or Ctrl+C)
    Run(RunArgs),

    /// Print generated login attempt payloads without sending them
    Sample(SampleArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Base URL of the service under test
    #[arg(long, default_value = "http://localhost:8000", env = "LOAD_TEST_HOST")]
    pub host: String,

    /// Path receiving login attempts
    #[arg(long, default_value = LOGIN_ATTEMPT_PATH, env = "LOAD_TEST_PATH")]
    pub path: String,

    /// User profile: smoke, baseline, stress
    #[arg(
        long,
        default_value = "baseline",
        value_parser = ["smoke", "baseline", "stress"]
    )]
    pub profile: String,

    /// Number of virtual users (overrides the profile)
    #[arg(short, long, env = "LOAD_TEST_USERS")]
    pub users: Option<usize>,

    /// Virtual users started per second (overrides the profile)
    #[arg(short = 'r', long)]
    pub spawn_rate: Option<f64>,

    /// Test duration in seconds, 0 runs until Ctrl+C
    #[arg(short = 't', long, default_value = "60")]
    pub run_time: u64,

    /// Minimum pause between two attempts of one user, in seconds
    #[arg(long, default_value = "1")]
    pub min_wait: f64,

    /// Maximum pause between two attempts of one user, in seconds
    #[arg(long, default_value = "5")]
    pub max_wait: f64,

    /// Verify the target's TLS certificate (off by default for self-signed
    /// test environments)
    #[arg(long)]
    pub verify_tls: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Live metrics refresh interval in seconds, 0 disables the live view
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    /// Number of payloads to print
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    fn run_arg_default(id: &str) -> Vec<String> {
        let cmd = Cli::command();
        let run = cmd.find_subcommand("run").expect("run subcommand");
        let arg = run
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {}", id));
        arg.get_default_values()
            .iter()
            .map(|value| value.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_env_backed_defaults() {
        // Read from the definition so exported LOAD_TEST_* variables don't matter
        assert_eq!(run_arg_default("host"), ["http://localhost:8000"]);
        assert_eq!(run_arg_default("path"), ["/api/login-attempt"]);
        assert!(run_arg_default("users").is_empty());
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from([
            "load-test",
            "run",
            "--host",
            "https://staging:8443",
            "--path",
            "/api/login",
        ])
        .unwrap();
        let Mode::Run(args) = cli.mode else {
            panic!("expected run mode");
        };
        assert_eq!(args.host, "https://staging:8443");
        assert_eq!(args.path, "/api/login");
        assert_eq!(args.profile, "baseline");
        assert_eq!(args.run_time, 60);
        assert_eq!(args.min_wait, 1.0);
        assert_eq!(args.max_wait, 5.0);
        assert!(!args.verify_tls);
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        let result = Cli::try_parse_from(["load-test", "run", "--profile", "soak"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_args() {
        let cli = Cli::try_parse_from(["load-test", "sample", "-n", "3", "--seed", "11"]).unwrap();
        let Mode::Sample(args) = cli.mode else {
            panic!("expected sample mode");
        };
        assert_eq!(args.count, 3);
        assert_eq!(args.seed, Some(11));
    }
}
