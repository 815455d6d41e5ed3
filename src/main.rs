//! pingboard Binary Entry Point
//!
//! Pings every configured department once, logs the results and shows the
//! status chart. Core functionality is provided by the `pingboard` library.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pingboard::{
    ChartOptions, LogSink, Prober, SystemPing, TargetsConfig,
    chart,
    config::DEFAULT_CONFIG_PATH,
    logging::DEFAULT_LOG_PATH,
    probe::{DEFAULT_ATTEMPTS, DEFAULT_TIMEOUT_SECS},
    run_probes,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Ping multiple departments and display results.
#[derive(Parser, Debug)]
#[command(name = "pingboard", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "PINGBOARD_CONFIG")]
    config: PathBuf,

    /// Path to log file
    #[arg(long, default_value = DEFAULT_LOG_PATH, env = "PINGBOARD_LOG")]
    log: PathBuf,

    /// Number of ping attempts per address
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Timeout for each ping attempt in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Save the graph as an image file
    #[arg(long)]
    save: bool,

    /// Directory for saved graphs
    #[arg(long, default_value = ".", env = "PINGBOARD_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Do not open the chart window
    #[arg(long)]
    no_show: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Configuration errors are fatal and reported before the log file is touched
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = TargetsConfig::load(&cli.config)?;
    tracing::info!("Loaded {} targets", config.len());

    let log = LogSink::open(&cli.log).map_err(|e| {
        format!("failed to open log file {}: {e}", cli.log.display())
    })?;
    let log = Arc::new(log);

    let prober = Prober::new(SystemPing::native(), Arc::clone(&log));
    let report = run_probes(&prober, &config.targets, cli.count, cli.timeout).await;

    for outcome in &report {
        tracing::info!(
            name = %outcome.target.name,
            address = %outcome.target.address,
            reachable = outcome.succeeded,
            average_rtt = %outcome.average_rtt,
            "{}",
            if outcome.succeeded { "UP" } else { "DOWN" }
        );
    }

    let options = ChartOptions {
        save: cli.save,
        show: !cli.no_show,
        output_dir: cli.output_dir,
    };
    // The chart window is shown from the main thread and blocks until closed.
    chart::publish(&report, &options, &log);

    log.flush();
    tracing::info!(
        "Done: {} reachable, {} unreachable",
        report.succeeded_count(),
        report.failed_count()
    );
    Ok(())
}
