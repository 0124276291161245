//! Configuration System
//!
//! Layered configuration for the composition pipeline: built-in defaults, an optional
//! user file, an optional explicit file, and `TRELLIS_` environment overrides.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod loader;
mod merge;
mod sources;

pub use loader::ConfigLoader;
pub use sources::user_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrellisConfig {
    /// Composition pass settings
    #[serde(default)]
    pub composition: CompositionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for [`crate::composer::Composer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// Prepare the whole tree before building any unit
    #[serde(default = "default_true")]
    pub prepare_before_build: bool,

    /// Upper bound on top-level units left after scraping
    #[serde(default)]
    pub max_top_level: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            prepare_before_build: default_true(),
            max_top_level: None,
        }
    }
}

impl CompositionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_top_level == Some(0) {
            return Err("max_top_level must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Composition(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Composition(msg) => write!(f, "Composition: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TrellisConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.composition.validate() {
            errors.push(ValidationError::Composition(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into one [`ConfigError`]
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(msgs.join("; "))
        })
    }

    /// Render as TOML, e.g. to seed a user config file
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
