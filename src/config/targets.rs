//! Target configuration structures.

use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::validation::{ConfigError, validate_targets};

// =============================================================================
// Constants
// =============================================================================

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

// =============================================================================
// Target
// =============================================================================

/// A named endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Unique display name (e.g. a department).
    pub name: String,
    /// Address handed verbatim to the reachability probe.
    pub address: String,
}

impl Target {
    /// Create a new target.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.name, self.address)
    }
}

// =============================================================================
// Config file
// =============================================================================

/// Structured-data format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension. Anything that is not
    /// `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Top-level configuration: the ordered list of targets to probe.
///
/// On disk this is a `departments` object mapping target name to address;
/// other top-level keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TargetsConfig {
    /// Targets in file order.
    #[serde(rename = "departments", deserialize_with = "ordered_targets")]
    pub targets: Vec<Target>,
}

impl TargetsConfig {
    /// Load configuration from a JSON or YAML file.
    ///
    /// # Errors
    /// - `ConfigError::NotFound` if the file cannot be read
    /// - `ConfigError::ParseError` if the contents are malformed
    /// - `ConfigError::ValidationError` if a target is unusable
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, ConfigFormat::from_path(path)).map_err(|e| match e {
            ConfigError::ParseError(msg) => {
                ConfigError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_targets(&self.targets)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Deserialize a `name -> address` map into targets, keeping source order.
///
/// Duplicate keys are kept here so that validation can reject them.
fn ordered_targets<'de, D>(deserializer: D) -> Result<Vec<Target>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TargetsVisitor;

    impl<'de> Visitor<'de> for TargetsVisitor {
        type Value = Vec<Target>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of target name to address string")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut targets = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, address)) = map.next_entry::<String, String>()? {
                targets.push(Target { name, address });
            }
            Ok(targets)
        }
    }

    deserializer.deserialize_map(TargetsVisitor)
}
