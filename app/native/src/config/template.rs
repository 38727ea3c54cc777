//! Configuration template generation.
//!
//! Generates a commented configuration file listing every option with its
//! default value.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Startpage Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Grid
  // ============================================================================
  // "grid": {
  //   // Number of columns on the board
  //   "columns": 12,
  //
  //   // Number of rows on the board
  //   "rows": 8,
  //
  //   // Gap between cells and around the board edge, in pixels
  //   "gap": 16
  // },

  // ============================================================================
  // Widget Placement
  // ============================================================================
  // "placement": {
  //   // Reject new widgets when there is no free space for them.
  //   // When false, they are placed at the top-left corner instead.
  //   "strictPlacement": false
  // },

  // ============================================================================
  // Persistence
  // ============================================================================
  // "persistence": {
  //   // Settings file location. Supports "~". Relative paths are resolved
  //   // against this file's directory. Empty uses the platform data directory.
  //   "path": "",
  //
  //   // Quiet period before changes are written (milliseconds)
  //   "debounceMs": 500,
  //
  //   // Extra attempts after a failed save
  //   "retries": 3,
  //
  //   // Delay before the first retry, doubled on each retry (milliseconds)
  //   "retryDelayMs": 1000,
  //
  //   // Remote settings endpoint. The local file is kept as a cache and
  //   // used while the endpoint is unreachable. Empty keeps settings local.
  //   "remoteUrl": ""
  // }
}
"#
    .to_string()
}

/// Writes the template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, generate_config_template())
}
