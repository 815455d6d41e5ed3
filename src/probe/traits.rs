//! Core probe traits and types.

use std::time::Duration;

use thiserror::Error;

use super::dialect::OutputDialect;

/// Message recorded when a probe exceeds its overall time budget.
pub const TIMEOUT_MESSAGE: &str = "Ping timed out";

/// Raw result of one external reachability check.
///
/// The text is opaque: its format depends on the tool, its version, the OS
/// and the locale. Only the [`OutputDialect`] of the probe interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProbeResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code, if the tool exited normally.
    pub exit_code: Option<i32>,
}

impl RawProbeResult {
    /// Create a result holding only standard output and a zero exit code.
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Set the exit code.
    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// Set standard error.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Best text to record when the check did not produce a reply: stdout,
    /// else stderr, else a description of the exit status.
    pub fn failure_text(&self) -> String {
        if !self.stdout.trim().is_empty() {
            return self.stdout.clone();
        }
        if !self.stderr.trim().is_empty() {
            return self.stderr.clone();
        }
        match self.exit_code {
            Some(code) => format!("ping exited with status {code}"),
            None => "ping terminated by signal".to_string(),
        }
    }
}

/// Ways a single probe can fail.
///
/// These never leave the probe layer: the executor folds each of them into a
/// non-succeeding outcome.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The tool ran but its output carried no reply marker.
    #[error("no reply: {output}")]
    Failure { output: String },

    /// The tool could not be started.
    #[error("failed to run ping tool: {0}")]
    Tool(#[source] std::io::Error),

    /// The overall time budget elapsed.
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// Any other fault.
    #[error("unexpected probe fault: {0}")]
    Unexpected(String),
}

impl ProbeError {
    /// Text stored as the outcome's raw output.
    pub fn outcome_text(&self) -> String {
        match self {
            Self::Failure { output } => output.clone(),
            Self::Tool(e) => e.to_string(),
            Self::Timeout => TIMEOUT_MESSAGE.to_string(),
            Self::Unexpected(msg) => msg.clone(),
        }
    }
}

/// An external reachability check.
///
/// Implementations may shell out to a platform ping tool or probe natively;
/// either way the pipeline only sees the raw text and the dialect that
/// interprets it.
#[async_trait::async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Dialect used to classify this probe's raw output.
    fn dialect(&self) -> OutputDialect;

    /// Run one check of `address` with `attempts` attempts, each bounded by
    /// `timeout`.
    ///
    /// # Returns
    ///
    /// - `Ok(raw)`: the check ran to completion, whatever it observed
    /// - `Err(ProbeError::Tool)`: the check could not be started
    /// - `Err(ProbeError::Unexpected)`: the check failed in some other way
    async fn check(
        &self,
        address: &str,
        attempts: u32,
        timeout: Duration,
    ) -> Result<RawProbeResult, ProbeError>;
}
