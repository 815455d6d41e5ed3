//! pingboard - department reachability checks
//!
//! This crate pings a list of named endpoints once, logs one line per probe,
//! and draws a red/green status chart. It can be used as a library, or run
//! as the `pingboard` binary.
//!
//! # Architecture
//!
//! - **Config**: ordered `departments` map loaded from JSON or YAML
//! - **Probe**: external reachability check behind [`ReachabilityProbe`],
//!   classified by [`Prober`] into a [`ProbeOutcome`]
//! - **Report**: [`run_probes`] collects outcomes in configuration order
//! - **Logging**: [`LogSink`] appends one line per probe as it completes
//! - **Chart**: [`chart::render`] / [`chart::publish`] draw, save and show
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pingboard::{LogSink, Prober, SystemPing, TargetsConfig, run_probes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TargetsConfig::load("config.json")?;
//!     let log = Arc::new(LogSink::open("ping.log")?);
//!     let prober = Prober::new(SystemPing::native(), Arc::clone(&log));
//!
//!     let report = run_probes(&prober, &config.targets, 4, 5).await;
//!     println!("{} of {} reachable", report.succeeded_count(), report.len());
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod logging;
pub mod probe;
pub mod report;

pub use chart::{ChartError, ChartOptions};
pub use config::{ConfigError, Target, TargetsConfig};
pub use logging::{LogLevel, LogSink};
pub use probe::{
    OutputDialect, ProbeError, ProbeOutcome, Prober, RawProbeResult, ReachabilityProbe,
    SystemPing,
};
pub use report::{Report, run_probes};
