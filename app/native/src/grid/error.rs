//! Error types for the widget grid.
//!
//! - [`LayoutError`] comes from the layout store alone
//! - [`SessionError`] covers co-managed operations on the session
//!
//! Invalid drag or resize previews are not errors; they surface as a
//! `valid: false` flag on the preview and are discarded on release.

use thiserror::Error;

use super::types::WidgetId;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised by [`LayoutStore`](super::LayoutStore) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A placement with the same id is already present.
    #[error("duplicate placement id: {0}")]
    DuplicateId(WidgetId),
}

/// Errors raised by [`Session`](super::Session) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The id is already used by an instance or placement.
    #[error("duplicate widget id: {0}")]
    DuplicateId(WidgetId),

    /// No widget instance has the given id.
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),

    /// A settings patch does not match the widget's settings shape.
    #[error("invalid settings for {id}: {reason}")]
    InvalidSettings {
        /// The widget whose settings were being updated.
        id: WidgetId,
        /// Why the patch was rejected.
        reason: String,
    },

    /// There is no free position for a widget of the requested size.
    ///
    /// Only returned when strict placement is enabled.
    #[error("no free position for a {w}x{h} widget")]
    GridFull {
        /// Requested width in cells.
        w: i32,
        /// Requested height in cells.
        h: i32,
    },
}

impl SessionError {
    /// Creates an invalid-settings error.
    pub fn invalid_settings(id: &WidgetId, reason: impl Into<String>) -> Self {
        Self::InvalidSettings { id: id.clone(), reason: reason.into() }
    }

    /// Returns `true` if the error refers to a missing widget.
    #[must_use]
    pub const fn is_not_found(&self) -> bool { matches!(self, Self::UnknownWidget(_)) }
}

impl From<LayoutError> for SessionError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::DuplicateId(id) => Self::DuplicateId(id),
        }
    }
}
