//! Paddock main entry point
//!
//! This is the command-line interface for the paddock results collector.

use clap::Parser;
use paddock::config::load_config;
use paddock::crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Paddock: a date-indexed race-results collector
///
/// Paddock walks a racing results site one meeting date at a time,
/// collects a structured record per race, and skips anything it has
/// already stored on previous runs.
#[derive(Parser, Debug)]
#[command(name = "paddock")]
#[command(version)]
#[command(about = "A date-indexed race-results collector", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// How many days of results to collect, overriding the config file
    #[arg(long, value_name = "N")]
    days: Option<i64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let days = cli.days.unwrap_or(config.crawler.days);
    tracing::info!("Collecting results for the last {} day(s)", days);

    match run_crawl(config, days).await {
        Ok(summary) => {
            tracing::info!(
                "Done: {} records stored, {} addresses skipped",
                summary.records_stored,
                summary.skipped
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paddock=info,warn"),
            1 => EnvFilter::new("paddock=debug,info"),
            2 => EnvFilter::new("paddock=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
