//! Probe executor: runs one check per target and classifies the outcome.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::time::timeout;

use super::traits::{ProbeError, RawProbeResult, ReachabilityProbe};
use crate::config::Target;
use crate::logging::LogSink;

/// Placeholder for a missing round-trip time.
pub const NOT_AVAILABLE: &str = "N/A";

/// Layout of [`ProbeOutcome::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default attempts per target.
pub const DEFAULT_ATTEMPTS: u32 = 4;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Result of probing one target. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub target: Target,
    pub succeeded: bool,
    /// Tool output on success or plain failure; the error text otherwise.
    pub raw_output: String,
    /// Local time the probe started, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Average round-trip time as printed by the tool, or `N/A`.
    pub average_rtt: String,
}

impl ProbeOutcome {
    /// Outcome of a probe that received a reply.
    pub fn success(
        target: Target,
        raw_output: impl Into<String>,
        timestamp: impl Into<String>,
        average_rtt: Option<String>,
    ) -> Self {
        Self {
            target,
            succeeded: true,
            raw_output: raw_output.into(),
            timestamp: timestamp.into(),
            average_rtt: average_rtt.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    /// Outcome of a probe that failed for any reason.
    pub fn failure(target: Target, message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            target,
            succeeded: false,
            raw_output: message.into(),
            timestamp: timestamp.into(),
            average_rtt: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.target.name
    }
}

/// Runs reachability checks and turns every result, including every fault,
/// into a [`ProbeOutcome`].
///
/// Each call writes exactly one line to the log sink: INFO on success,
/// ERROR otherwise.
pub struct Prober<P> {
    probe: P,
    log: Arc<LogSink>,
}

impl<P: ReachabilityProbe> Prober<P> {
    pub fn new(probe: P, log: Arc<LogSink>) -> Self {
        Self { probe, log }
    }

    /// The underlying reachability check.
    pub fn reachability(&self) -> &P {
        &self.probe
    }

    /// Probe one target.
    ///
    /// Each attempt waits up to `timeout_secs`; the whole check is abandoned
    /// after `timeout_secs * attempts`. This method has no error channel.
    pub async fn probe(&self, target: &Target, attempts: u32, timeout_secs: u64) -> ProbeOutcome {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let attempts = attempts.max(1);
        let per_attempt = Duration::from_secs(timeout_secs);
        let overall = per_attempt.saturating_mul(attempts);

        let result = match timeout(
            overall,
            self.probe.check(&target.address, attempts, per_attempt),
        )
        .await
        {
            Ok(Ok(raw)) => self.classify(raw),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProbeError::Timeout),
        };

        match result {
            Ok((raw_output, average_rtt)) => {
                self.log.info(format!(
                    "Ping to {} at {} successful. {}",
                    target.name, target.address, raw_output
                ));
                ProbeOutcome::success(target.clone(), raw_output, timestamp, average_rtt)
            }
            Err(e) => {
                self.log.error(failure_message(target, &e));
                ProbeOutcome::failure(target.clone(), e.outcome_text(), timestamp)
            }
        }
    }

    /// Decide success from the reply marker and pull out the average RTT.
    fn classify(&self, raw: RawProbeResult) -> Result<(String, Option<String>), ProbeError> {
        let dialect = self.probe.dialect();
        if dialect.is_reply(&raw.stdout) {
            let average_rtt = dialect.average_rtt(&raw.stdout);
            Ok((raw.stdout, average_rtt))
        } else {
            Err(ProbeError::Failure {
                output: raw.failure_text(),
            })
        }
    }
}

impl<P> std::fmt::Debug for Prober<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober").finish_non_exhaustive()
    }
}

/// Log line for a failed probe.
fn failure_message(target: &Target, error: &ProbeError) -> String {
    match error {
        ProbeError::Failure { output } => format!(
            "Ping to {} at {} failed. {}",
            target.name, target.address, output
        ),
        ProbeError::Tool(_) => format!(
            "Ping to {} at {} failed: {}",
            target.name, target.address, error
        ),
        ProbeError::Timeout => format!("Ping to {} at {} timed out.", target.name, target.address),
        ProbeError::Unexpected(msg) => format!(
            "An error occurred while pinging {} at {}: {}",
            target.name, target.address, msg
        ),
    }
}
