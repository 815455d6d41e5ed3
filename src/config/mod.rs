//! Configuration module for pingboard.
//!
//! Loads the target list from a JSON (default) or YAML file:
//!
//! ```json
//! { "departments": { "HQ": "10.0.0.1", "Branch": "10.0.0.2" } }
//! ```
//!
//! Target order in the file is preserved; it drives probe and chart order.

mod targets;
mod validation;

pub use targets::{ConfigFormat, DEFAULT_CONFIG_PATH, Target, TargetsConfig};
pub use validation::{ConfigError, validate_targets};
