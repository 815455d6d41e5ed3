//! Configuration errors and validation utilities.

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use super::targets::Target;

/// Configuration error types.
///
/// All of these are fatal: they are raised before the ping log is opened and
/// before any target is probed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist or cannot be read.
    #[error("config file not found or unreadable: {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration contents are not valid structured data, or lack the
    /// `departments` collection.
    #[error("failed to parse config: {0}")]
    ParseError(String),

    /// Configuration parsed but a value is unusable.
    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Validate a target list: names must be unique and non-empty, addresses
/// must not be blank.
///
/// # Errors
/// Returns `ConfigError::ValidationError` naming the first offending target.
pub fn validate_targets(targets: &[Target]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for target in targets {
        if target.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "target name cannot be empty".to_string(),
            ));
        }
        if target.address.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "target '{}': address cannot be empty",
                target.name
            )));
        }
        if !seen_names.insert(target.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate target name: '{}'",
                target.name
            )));
        }
    }

    Ok(())
}
