//! Probe Layer
//!
//! Reachability checks against configured targets.
//!
//! - [`ReachabilityProbe`]: the external check (one method, raw text out)
//! - [`SystemPing`]: shells out to the platform `ping`
//! - [`OutputDialect`]: reply marker and average-RTT pattern per platform
//! - [`Prober`]: bounds a check by its timeout, classifies it and logs it
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pingboard::{LogSink, Prober, SystemPing, Target};
//!
//! # async fn run() -> std::io::Result<()> {
//! let log = Arc::new(LogSink::open("ping.log")?);
//! let prober = Prober::new(SystemPing::native(), log);
//! let outcome = prober.probe(&Target::new("HQ", "10.0.0.1"), 4, 5).await;
//! println!("{} -> {}", outcome.name(), outcome.succeeded);
//! # Ok(())
//! # }
//! ```

mod dialect;
mod executor;
mod system;
mod traits;

pub use dialect::OutputDialect;
pub use executor::{
    DEFAULT_ATTEMPTS, DEFAULT_TIMEOUT_SECS, NOT_AVAILABLE, ProbeOutcome, Prober, TIMESTAMP_FORMAT,
};
pub use system::{DEFAULT_PING_PROGRAM, SystemPing};
pub use traits::{ProbeError, RawProbeResult, ReachabilityProbe, TIMEOUT_MESSAGE};
