//! Error types for the trellis composition pipeline.

use thiserror::Error;

/// Errors raised while preparing or building a composed unit tree.
///
/// Failures coming from user factories, context tasks, transformers and claimed
/// children are propagated unchanged. A child that fails aborts its container
/// with the child's own error, so the caller always sees the original diagnostic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("{factory} does not accept {context} ({found}) as a context, expected {expected}")]
    ContextTypeMismatch {
        factory: String,
        expected: &'static str,
        found: &'static str,
        context: String,
    },

    #[error("{task} cannot be performed on {unit}, expected {expected}")]
    UnitTypeMismatch {
        task: String,
        expected: &'static str,
        unit: String,
    },

    #[error("Children have already been scraped by {0}")]
    ChildrenAlreadyScraped(String),

    #[error("{0} has already been prepared")]
    AlreadyPrepared(String),

    #[error("{0} has already been built")]
    AlreadyBuilt(String),

    #[error("{container} built {pending} claimed children without embedding them")]
    ChildrenNotEmbedded { container: String, pending: usize },

    #[error("Composition failed: {0}")]
    CompositionFailed(String),

    #[error("{0}")]
    Message(String),
}

impl RoutingError {
    /// Convenience constructor for failures raised by user factories and tasks.
    pub fn message(msg: impl Into<String>) -> Self {
        RoutingError::Message(msg.into())
    }
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}
