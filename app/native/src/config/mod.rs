//! Configuration module for Startpage.
//!
//! The configuration is loaded once per process and cached in a global.
//! The configuration file supports JSONC format (JSON with comments).

pub mod template;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    ConfigError, GridConfig, PersistenceConfig, PlacementConfig, StartpageConfig, config_paths,
    default_settings_path, load_config as load_config_default, load_config_from_path,
};

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<StartpageConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// Must be called before the configuration is first read. Returns `false`
/// if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Returns the custom configuration path, if one was set.
pub fn custom_config_path() -> Option<&'static PathBuf> { CUSTOM_CONFIG_PATH.get() }

fn load_or_default() -> StartpageConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            StartpageConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            StartpageConfig::default()
        }
    }
}

/// Returns the global configuration instance, loading it on first use.
///
/// A missing or invalid configuration file yields the defaults.
pub fn get_config() -> &'static StartpageConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

/// Resolved settings file path for the global configuration.
#[must_use]
pub fn settings_path() -> PathBuf {
    let base_dir = get_config_path().and_then(|path| path.parent());
    get_config().persistence.settings_path(base_dir)
}
