//! Errors raised while loading or saving the settings document.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur while persisting settings.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the settings file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON for its shape.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// No settings document exists yet.
    #[error("no settings found at {}", .0.display())]
    NotFound(PathBuf),

    /// The remote settings endpoint could not be reached.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote settings endpoint answered with an error status.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// A background save did not run to completion.
    #[error("save task failed: {0}")]
    Task(String),

    /// A share code could not be decoded.
    #[error("invalid share code: {0}")]
    ShareCode(String),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Returns `true` if the document does not exist, locally or remotely.
    ///
    /// Missing documents are never retried.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }
}
