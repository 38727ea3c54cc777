//! Error types for Startpage.
//!
//! [`StartpageError`] is what CLI commands return. The error enums of the
//! individual modules convert into it.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::SessionError;
use crate::persistence::PersistError;

/// Errors that can occur while running a command.
///
/// Serializes as `{"kind": ..., "message": ...}` so it can be printed as
/// JSON as well.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum StartpageError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// A board operation was rejected.
    #[error("Layout error: {0}")]
    LayoutError(String),
    /// Loading or saving settings failed.
    #[error("Settings error: {0}")]
    PersistError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<SessionError> for StartpageError {
    fn from(err: SessionError) -> Self { Self::LayoutError(err.to_string()) }
}

impl From<PersistError> for StartpageError {
    fn from(err: PersistError) -> Self { Self::PersistError(err.to_string()) }
}

impl From<ConfigError> for StartpageError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<std::io::Error> for StartpageError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for StartpageError {
    fn from(err: serde_json::Error) -> Self { Self::InvalidArguments(err.to_string()) }
}

impl From<String> for StartpageError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for StartpageError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WidgetId;

    #[test]
    fn test_session_error_converts() {
        let err: StartpageError = SessionError::UnknownWidget(WidgetId::new("clock-9")).into();
        assert!(matches!(err, StartpageError::LayoutError(_)));
        assert!(err.to_string().contains("clock-9"));
    }

    #[test]
    fn test_persist_error_converts() {
        let err: StartpageError = PersistError::ShareCode("bad padding".to_string()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("Settings error"));
        assert!(msg.contains("bad padding"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: StartpageError = ConfigError::NotFound.into();
        assert!(matches!(err, StartpageError::ConfigError(_)));
    }

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: StartpageError = io_err.into();
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_json_error_is_invalid_arguments() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StartpageError = json_err.into();
        assert!(matches!(err, StartpageError::InvalidArguments(_)));
    }

    #[test]
    fn test_command_error_display() {
        let err: StartpageError = "move not accepted".into();
        assert_eq!(err.to_string(), "move not accepted");
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let err = StartpageError::LayoutError("grid is full".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "LayoutError");
        assert_eq!(json["message"], "grid is full");
    }
}
