//! Application-wide constants.

/// Application name, used for config and data directories.
pub const APP_NAME: &str = "startpage";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "STARTPAGE_LOG";

/// Default number of grid columns.
pub const DEFAULT_GRID_COLUMNS: i32 = 12;

/// Default number of grid rows.
pub const DEFAULT_GRID_ROWS: i32 = 8;

/// Default gap between cells, in pixels.
pub const DEFAULT_GRID_GAP: f64 = 16.0;

/// File name of the persisted settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Current version of the persisted settings document.
pub const SETTINGS_VERSION: u32 = 1;
