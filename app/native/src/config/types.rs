//! Configuration types for Startpage.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    APP_NAME, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_GAP, DEFAULT_GRID_ROWS, SETTINGS_FILE_NAME,
};
use crate::grid::GridDimensions;
use crate::platform::path::{expand, expand_and_resolve};

/// Grid shape and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Number of columns on the board.
    /// Default: 12
    pub columns: i32,

    /// Number of rows on the board.
    /// Default: 8
    pub rows: i32,

    /// Gap between cells and around the board edge, in pixels.
    /// Default: 16
    pub gap: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            gap: DEFAULT_GRID_GAP,
        }
    }
}

impl GridConfig {
    /// The grid dimensions, with non-positive values replaced by defaults.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        let cols = if self.columns > 0 { self.columns } else { DEFAULT_GRID_COLUMNS };
        let rows = if self.rows > 0 { self.rows } else { DEFAULT_GRID_ROWS };
        GridDimensions::new(cols, rows)
    }

    /// The cell gap, with negative values clamped to zero.
    #[must_use]
    pub fn gap(&self) -> f64 { self.gap.max(0.0) }
}

/// How new widgets are placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementConfig {
    /// Reject new widgets when the board has no free space for them.
    ///
    /// When false, a widget that does not fit is placed at the top-left
    /// corner and may overlap others.
    /// Default: false
    pub strict_placement: bool,
}

/// Settings file location and save timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistenceConfig {
    /// Path to the settings file. Supports `~`.
    /// Empty uses the platform data directory.
    /// Default: ""
    pub path: String,

    /// Quiet period in milliseconds before changes are written.
    /// Default: 500
    pub debounce_ms: u64,

    /// Extra attempts after a failed save.
    /// Default: 3
    pub retries: u32,

    /// Delay in milliseconds before the first retry; doubles on each retry.
    /// Default: 1000
    pub retry_delay_ms: u64,

    /// Base URL of a remote settings endpoint. Settings are read from and
    /// written to `<remoteUrl>/settings/1`, with the local file as cache.
    /// Empty keeps settings local only.
    /// Default: ""
    pub remote_url: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            debounce_ms: 500,
            retries: 3,
            retry_delay_ms: 1000,
            remote_url: String::new(),
        }
    }
}

impl PersistenceConfig {
    /// Resolved path of the settings file.
    ///
    /// Relative paths are resolved against `base_dir`, normally the
    /// directory of the loaded config file.
    #[must_use]
    pub fn settings_path(&self, base_dir: Option<&Path>) -> PathBuf {
        if self.path.trim().is_empty() {
            return default_settings_path();
        }
        match base_dir {
            Some(base) => expand_and_resolve(&self.path, base),
            None => expand(&self.path),
        }
    }
}

/// Default settings file location: `<data dir>/startpage/settings.json`.
#[must_use]
pub fn default_settings_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join(APP_NAME)
        .join(SETTINGS_FILE_NAME)
}

/// Root configuration structure for Startpage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StartpageConfig {
    /// Grid shape and spacing.
    pub grid: GridConfig,

    /// Widget placement behaviour.
    pub placement: PlacementConfig,

    /// Settings file location and save timing.
    pub persistence: PersistenceConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/startpage/config.jsonc, \
         the platform config directory, or ~/.startpage.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".startpage.jsonc", ".startpage.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/startpage/config.jsonc` or `config.json`, if set
/// 2. `~/.config/startpage/config.jsonc` or `config.json`
/// 3. `<platform config dir>/startpage/config.jsonc` or `config.json`
/// 4. `~/.startpage.jsonc` or `~/.startpage.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let push_dir = |dir: PathBuf, paths: &mut Vec<PathBuf>| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the error from [`load_config_from_path`].
pub fn load_config() -> Result<(StartpageConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

/// Loads the configuration from a specific file.
///
/// Comments are stripped before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read and `ConfigError::ParseError`
/// if it is not valid JSONC for the configuration shape.
pub fn load_config_from_path(path: &Path) -> Result<(StartpageConfig, PathBuf), ConfigError> {
    let path = expand(&path.to_string_lossy());
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let file = fs::File::open(&path)?;
    let reader = json_comments::StripComments::new(file);
    let config: StartpageConfig = serde_json::from_reader(reader)?;
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StartpageConfig::default();
        assert_eq!(config.grid.dimensions(), GridDimensions::new(12, 8));
        assert!((config.grid.gap() - 16.0).abs() < f64::EPSILON);
        assert!(!config.placement.strict_placement);
        assert_eq!(config.persistence.debounce_ms, 500);
        assert_eq!(config.persistence.retries, 3);
        assert_eq!(config.persistence.retry_delay_ms, 1000);
        assert!(config.persistence.remote_url.is_empty());
    }

    #[test]
    fn test_config_deserializes_camel_case() {
        let json = r#"{
            "grid": { "columns": 16, "gap": 8 },
            "placement": { "strictPlacement": true },
            "persistence": { "debounceMs": 250 }
        }"#;

        let config: StartpageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid.dimensions(), GridDimensions::new(16, 8));
        assert!(config.placement.strict_placement);
        assert_eq!(config.persistence.debounce_ms, 250);
        assert_eq!(config.persistence.retries, 3);
    }

    #[test]
    fn test_parse_remote_url() {
        let json = r#"{ "persistence": { "remoteUrl": "https://api.example.org/v1" } }"#;
        let config: StartpageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.persistence.remote_url, "https://api.example.org/v1");
        assert!(config.persistence.path.is_empty());
    }

    #[test]
    fn test_invalid_dimensions_fall_back_to_defaults() {
        let grid = GridConfig { columns: 0, rows: -3, gap: -1.0 };
        assert_eq!(grid.dimensions(), GridDimensions::new(12, 8));
        assert!(grid.gap().abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_config_from_path_strips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(
            &path,
            "{\n  // fewer rows\n  \"grid\": { \"rows\": 6 /* tall cells */ }\n}\n",
        )
        .unwrap();

        let (config, loaded_from) = load_config_from_path(&path).unwrap();
        assert_eq!(config.grid.rows, 6);
        assert_eq!(loaded_from, path);
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"grid\": 12 }").unwrap();
        assert!(matches!(load_config_from_path(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_settings_path_expands_tilde() {
        let config = PersistenceConfig { path: "~/boards/home.json".into(), ..Default::default() };
        let path = config.settings_path(Some(Path::new("/etc/startpage")));
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("boards/home.json"));
        assert!(!path.starts_with("/etc/startpage"));
    }

    #[test]
    fn test_relative_settings_path_resolves_against_base() {
        let config = PersistenceConfig { path: "boards/home.json".into(), ..Default::default() };
        let path = config.settings_path(Some(Path::new("/etc/startpage")));
        assert_eq!(path, PathBuf::from("/etc/startpage/boards/home.json"));
    }

    #[test]
    fn test_default_settings_path() {
        let path = PersistenceConfig::default().settings_path(None);
        assert!(path.ends_with("startpage/settings.json"));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }
}
