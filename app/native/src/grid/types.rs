//! Core value types for the widget grid.
//!
//! Everything here is measured in grid cells, not pixels:
//! - `GridRect` is a bare rectangle (top-left cell + size)
//! - `Placement` is a `GridRect` owned by one widget instance
//! - `GridDimensions` is the fixed canvas shape for a session
//!
//! Cell coordinates are signed so that candidates computed from pointer
//! input can be represented before they are clamped into the grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS};

// ============================================================================
// Identity
// ============================================================================

/// Identifier shared by a placement and its widget instance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wraps an existing identifier (e.g. one loaded from settings).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Generates a fresh, time-ordered identifier with a readable prefix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self { Self(format!("{prefix}-{}", Uuid::now_v7().simple())) }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self { Self(id) }
}

// ============================================================================
// Geometry Types
// ============================================================================

/// A size in grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub w: i32,
    pub h: i32,
}

impl GridSize {
    #[must_use]
    pub const fn new(w: i32, h: i32) -> Self { Self { w, h } }
}

/// A top-left cell coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

/// A rectangle on the cell grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridRect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self { Self { x, y, w, h } }

    /// Create a rectangle from a position and a size.
    #[must_use]
    pub const fn from_parts(origin: GridPoint, size: GridSize) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    #[must_use]
    pub const fn origin(&self) -> GridPoint { GridPoint::new(self.x, self.y) }

    #[must_use]
    pub const fn size(&self) -> GridSize { GridSize::new(self.w, self.h) }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 { self.x + self.w }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 { self.y + self.h }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(&self) -> i32 { self.w * self.h }

    /// Returns a copy moved to `origin`, keeping the size.
    #[must_use]
    pub const fn with_origin(self, origin: GridPoint) -> Self {
        Self::new(origin.x, origin.y, self.w, self.h)
    }

    /// Returns a copy with the given size, keeping the origin.
    #[must_use]
    pub const fn with_size(self, size: GridSize) -> Self {
        Self::new(self.x, self.y, size.w, size.h)
    }
}

/// The fixed shape of the grid for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    pub cols: i32,
    pub rows: i32,
}

impl GridDimensions {
    #[must_use]
    pub const fn new(cols: i32, rows: i32) -> Self { Self { cols, rows } }

    /// The whole canvas as a rectangle.
    #[must_use]
    pub const fn bounds(&self) -> GridRect { GridRect::new(0, 0, self.cols, self.rows) }
}

impl Default for GridDimensions {
    fn default() -> Self { Self::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS) }
}

// ============================================================================
// Placement
// ============================================================================

/// Where one widget instance sits on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    #[serde(alias = "i")]
    pub id: WidgetId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Placement {
    /// Create a placement for `id` covering `rect`.
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, rect: GridRect) -> Self {
        debug_assert!(rect.w >= 0 && rect.h >= 0, "placement size must not be negative");
        Self {
            id: id.into(),
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        }
    }

    /// The cell rectangle covered by this placement.
    #[must_use]
    pub const fn rect(&self) -> GridRect { GridRect::new(self.x, self.y, self.w, self.h) }

    /// Overwrites position and size from `rect`.
    pub const fn set_rect(&mut self, rect: GridRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }
}

// ============================================================================
// Tests
// ============================================================================
