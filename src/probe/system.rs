//! Reachability probe backed by the system `ping` binary.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::dialect::OutputDialect;
use super::traits::{ProbeError, RawProbeResult, ReachabilityProbe};

/// Default program name, resolved through `PATH`.
pub const DEFAULT_PING_PROGRAM: &str = "ping";

/// Shells out to a platform ping tool and captures its output.
///
/// The child is killed if the check is abandoned (for example when the
/// caller's timeout fires).
#[derive(Debug, Clone)]
pub struct SystemPing {
    program: String,
    dialect: OutputDialect,
}

impl SystemPing {
    /// Create a probe for the given program and output dialect.
    pub fn new(program: impl Into<String>, dialect: OutputDialect) -> Self {
        Self {
            program: program.into(),
            dialect,
        }
    }

    /// The platform's own `ping`.
    pub fn native() -> Self {
        Self::new(DEFAULT_PING_PROGRAM, OutputDialect::native())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command-line arguments for one check.
    ///
    /// Windows takes the per-reply wait in milliseconds; iputils in seconds;
    /// macOS in milliseconds.
    pub fn args(&self, address: &str, attempts: u32, timeout: Duration) -> Vec<String> {
        match self.dialect {
            OutputDialect::Windows => vec![
                "-n".to_string(),
                attempts.to_string(),
                "-w".to_string(),
                timeout.as_millis().to_string(),
                address.to_string(),
            ],
            OutputDialect::Unix => {
                let wait = if cfg!(target_os = "macos") {
                    timeout.as_millis().to_string()
                } else {
                    timeout.as_secs().max(1).to_string()
                };
                vec![
                    "-c".to_string(),
                    attempts.to_string(),
                    "-W".to_string(),
                    wait,
                    address.to_string(),
                ]
            }
        }
    }
}

impl Default for SystemPing {
    fn default() -> Self {
        Self::native()
    }
}

#[async_trait::async_trait]
impl ReachabilityProbe for SystemPing {
    fn dialect(&self) -> OutputDialect {
        self.dialect
    }

    async fn check(
        &self,
        address: &str,
        attempts: u32,
        timeout: Duration,
    ) -> Result<RawProbeResult, ProbeError> {
        let args = self.args(address, attempts, timeout);
        tracing::debug!(program = %self.program, ?args, "Running ping");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ProbeError::Tool)?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProbeError::Unexpected(format!("failed to collect ping output: {e}")))?;

        Ok(RawProbeResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
