//! Integration tests for the configuration system

use super::test_utils::*;
use trellis::action::Standalone;
use trellis::composer::Composer;
use trellis::config::{ConfigLoader, TrellisConfig};
use trellis::error::RoutingError;
use trellis::factory::FactoryBox;
use tempfile::TempDir;

#[derive(Debug)]
struct NeedsNumber;

impl trellis::Factory for NeedsNumber {
    type Context = u8;
    type Unit = u8;

    fn build(&self, context: &u8) -> Result<u8, RoutingError> {
        Ok(*context)
    }
}

#[test]
fn test_loaded_config_drives_composer() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("trellis.toml");
    std::fs::write(
        &config_file,
        r#"
[composition]
prepare_before_build = false
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let composer = Composer::new(config.composition);

    let log = new_log();
    let composition = composer
        .compose(vec![
            leaf("home", &log, Standalone),
            FactoryBox::boxed(NeedsNumber, Standalone),
        ])
        .unwrap();

    // Without the prepare pass the first unit is built before the mismatch surfaces
    let err = composition.run(&session("ada")).unwrap_err();
    assert!(matches!(err, RoutingError::ContextTypeMismatch { .. }));
    assert_eq!(entries(&log), vec!["build home"]);
}

#[test]
fn test_default_config_prepares_first() {
    let composer = Composer::new(TrellisConfig::default().composition);
    let log = new_log();
    let composition = composer
        .compose(vec![
            leaf("home", &log, Standalone),
            FactoryBox::boxed(NeedsNumber, Standalone),
        ])
        .unwrap();

    assert!(composition.run(&session("ada")).is_err());
    assert_eq!(entries(&log), vec!["prepare home"]);
}

#[test]
fn test_user_file_and_environment_layers() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let config_home = temp_dir.path().join("config");
    std::fs::create_dir_all(config_home.join("trellis")).unwrap();
    std::fs::write(
        config_home.join("trellis").join("config.toml"),
        "[composition]\nmax_top_level = 4\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let previous_config_home = std::env::var("XDG_CONFIG_HOME").ok();
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::set_var("TRELLIS_COMPOSITION__MAX_TOP_LEVEL", "2");

    let loaded = ConfigLoader::load();

    std::env::remove_var("TRELLIS_COMPOSITION__MAX_TOP_LEVEL");
    match previous_config_home {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let config: TrellisConfig = loaded.unwrap();
    assert_eq!(config.composition.max_top_level, Some(2));
    assert_eq!(config.logging.level, "warn");
    assert!(config.composition.prepare_before_build);
}
