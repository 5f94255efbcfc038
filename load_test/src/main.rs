use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use login_load_test::cli::{Cli, Mode, SampleArgs};
use login_load_test::scenarios::login_attempt::{self, sample_payloads, PayloadRanges};
use login_load_test::LoadTestConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.mode {
        Mode::Run(args) => {
            // Initialize tracing
            let default_level = if args.verbose { "debug" } else { "info" };
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
                )
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;

            let run_id = uuid::Uuid::new_v4();
            tracing::info!("Login Attempt Load Test Starting (run {})", run_id);
            tracing::info!("Host: {}", args.host);
            tracing::info!("Path: {}", args.path);
            tracing::info!("Profile: {}", args.profile);
            if args.run_time > 0 {
                tracing::info!("Duration: {}s", args.run_time);
            } else {
                tracing::info!("Duration: until Ctrl+C");
            }
            tracing::info!("Wait: {}s - {}s", args.min_wait, args.max_wait);

            let config = LoadTestConfig::from_args(&args)?;
            login_attempt::run(config).await?;

            tracing::info!("Load test complete");
        }

        Mode::Sample(args) => print_samples(&args)?,
    }

    Ok(())
}

/// Print generated payloads as JSON lines
fn print_samples(args: &SampleArgs) -> Result<()> {
    for payload in sample_payloads(args.count, args.seed, &PayloadRanges::default()) {
        println!("{}", serde_json::to_string(&payload)?);
    }

    Ok(())
}
