//! Entry points for loading [`TrellisConfig`].

use super::{merge, sources, TrellisConfig};
use crate::error::ConfigError;
use std::path::Path;
use tracing::debug;

/// Loads configuration from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the user file, then the environment.
    pub fn load() -> Result<TrellisConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::add_user_file(builder);
        let builder = sources::add_environment(builder);
        Self::finish(builder)
    }

    /// Defaults, then `path`. The environment is not consulted.
    pub fn load_from_file(path: &Path) -> Result<TrellisConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::add_file(builder, path);
        debug!(config_path = %path.display(), "Loading configuration file");
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<TrellisConfig, ConfigError> {
        let config: TrellisConfig = builder.build()?.try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }
}
