//! Configuration sources: user file, explicit file, environment.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the user config file: `<config dir>/trellis/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "trellis")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the user config file if it exists.
pub fn add_user_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match user_config_path() {
        Some(path) if path.exists() => builder.add_source(File::from(path).required(false)),
        Some(path) => {
            debug!(config_path = %path.display(), "No user configuration file");
            builder
        }
        None => builder,
    }
}

/// Add an explicit config file, which must exist.
pub fn add_file(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path.to_path_buf()).required(true))
}

/// Add `TRELLIS_` environment overrides, e.g. `TRELLIS_COMPOSITION__MAX_TOP_LEVEL=3`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TRELLIS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
