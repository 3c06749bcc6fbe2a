#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use navcheck::config::ConfigOverrides;
use navcheck::errors::NavcheckError;
use navcheck::types::OutputFormat;

// Exit codes
const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "navcheck")]
#[command(about = "Resilient navigation checks for mobile apps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a navigation scenario against a WebDriver/Appium session
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Config file (defaults to ~/.navcheck/config.json when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// WebDriver/Appium server URL
        #[arg(long)]
        webdriver_url: Option<String>,

        /// Whole-scenario budget in milliseconds
        #[arg(long)]
        budget_ms: Option<u64>,

        /// Interval between existence checks in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,

        /// Time a locator chain may spend when a step sets no timeout
        #[arg(long)]
        resolve_budget_ms: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Check a scenario file without connecting to a device
    Validate {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Handle exit codes based on error type
    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Convert to our error type to get proper exit code
            let navcheck_err: NavcheckError = err.into();

            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": navcheck_err.to_string(),
                "exit_code": navcheck_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", navcheck_err);
            std::process::exit(navcheck_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "navcheck=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            webdriver_url,
            budget_ms,
            poll_ms,
            resolve_budget_ms,
            format,
        } => {
            let overrides = ConfigOverrides {
                webdriver_url,
                budget_ms,
                poll_interval_ms: poll_ms,
                resolve_budget_ms,
            };
            commands::run::handle_run(scenario, config, overrides, format).await?
        }

        Commands::Validate { scenario, format } => {
            commands::validate::handle_validate(scenario, format).await?
        }

        Commands::Version => commands::version::handle_version().await?,
    }

    Ok(())
}
