//! Maps grid placements to screen-space rectangles.
//!
//! Cells are square: the cell size is derived from the available width and
//! used for both axes. Every cell is separated from its neighbours and from
//! the canvas edge by `gap` pixels.
//!
//! ```text
//! gap | cell | gap | cell | gap | ... | cell | gap
//! ```
//!
//! A placement at column `x` spanning `w` cells therefore starts at
//! `x * (cell + gap) + gap` and is `w * cell + (w - 1) * gap` wide.

use serde::Serialize;
use smallvec::SmallVec;

use super::interaction::PreviewRect;
use super::layout_store::LayoutStore;
use super::registry::WidgetRegistry;
use super::types::{GridDimensions, GridPoint, GridRect, WidgetId};
use crate::widgets::WidgetInstance;

/// Inline capacity for rendered widgets; a board rarely holds more.
pub const RENDER_INLINE_CAP: usize = 16;

// ============================================================================
// Screen-Space Types
// ============================================================================

/// A point in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A rectangle in screen pixels, relative to the grid canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A placement expressed as 1-based CSS grid lines (end exclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSpan {
    pub column_start: i32,
    pub column_end: i32,
    pub row_start: i32,
    pub row_end: i32,
}

impl TrackSpan {
    #[must_use]
    pub const fn of(rect: &GridRect) -> Self {
        Self {
            column_start: rect.x + 1,
            column_end: rect.x + rect.w + 1,
            row_start: rect.y + 1,
            row_end: rect.y + rect.h + 1,
        }
    }
}

// ============================================================================
// Grid Metrics
// ============================================================================

/// Pixel geometry of the grid for the current viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    pub dims: GridDimensions,
    /// Gap between cells and around the canvas edge, in pixels.
    pub gap: f64,
    /// Side length of one square cell, in pixels.
    pub cell_size: f64,
    /// Screen position of the canvas' top-left corner.
    pub origin: ScreenPoint,
}

impl GridMetrics {
    /// Metrics for a canvas `width` pixels wide with its origin at `(0, 0)`.
    #[must_use]
    pub fn for_width(dims: GridDimensions, gap: f64, width: f64) -> Self {
        Self {
            dims,
            gap,
            cell_size: cell_size_for_width(width, dims.cols, gap),
            origin: ScreenPoint::default(),
        }
    }

    /// Returns a copy with the canvas origin moved to `origin`.
    #[must_use]
    pub const fn with_origin(mut self, origin: ScreenPoint) -> Self {
        self.origin = origin;
        self
    }

    /// Distance between the starts of two adjacent cells.
    #[must_use]
    pub fn pitch(&self) -> f64 { self.cell_size + self.gap }

    /// Screen rectangle of `rect`, relative to the canvas origin.
    #[must_use]
    pub fn to_screen(&self, rect: &GridRect) -> ScreenRect {
        let pitch = self.pitch();
        ScreenRect {
            left: f64::from(rect.x) * pitch + self.gap,
            top: f64::from(rect.y) * pitch + self.gap,
            width: span_length(rect.w, self.cell_size, self.gap),
            height: span_length(rect.h, self.cell_size, self.gap),
        }
    }

    /// Total canvas height including the outer gaps.
    #[must_use]
    pub fn canvas_height(&self) -> f64 {
        f64::from(self.dims.rows) * self.cell_size + f64::from(self.dims.rows + 1) * self.gap
    }

    /// The cell under `point`, clamped into the grid.
    ///
    /// The pointer's offset from the origin is floor-divided by the pitch.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn cell_at(&self, point: ScreenPoint) -> GridPoint {
        let pitch = self.pitch();
        if pitch <= 0.0 {
            return GridPoint::default();
        }
        let col = ((point.x - self.origin.x) / pitch).floor() as i32;
        let row = ((point.y - self.origin.y) / pitch).floor() as i32;
        GridPoint::new(
            col.clamp(0, (self.dims.cols - 1).max(0)),
            row.clamp(0, (self.dims.rows - 1).max(0)),
        )
    }

    /// Screen position of the centre of cell `point`, origin included.
    #[must_use]
    pub fn cell_center(&self, point: GridPoint) -> ScreenPoint {
        let pitch = self.pitch();
        let half = self.cell_size / 2.0;
        ScreenPoint::new(
            self.origin.x + f64::from(point.x) * pitch + self.gap + half,
            self.origin.y + f64::from(point.y) * pitch + self.gap + half,
        )
    }

    /// Converts a pixel delta into a whole number of cells, rounding to the
    /// nearest cell.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn cells_for_delta(&self, delta: f64) -> i32 {
        let pitch = self.pitch();
        if pitch <= 0.0 {
            return 0;
        }
        (delta / pitch).round() as i32
    }
}

/// Square cell size that fits `cols` cells and `cols + 1` gaps in `width`.
#[must_use]
pub fn cell_size_for_width(width: f64, cols: i32, gap: f64) -> f64 {
    if cols <= 0 {
        return 0.0;
    }
    let cols = f64::from(cols);
    ((width - gap * (cols + 1.0)) / cols).max(0.0)
}

fn span_length(cells: i32, cell_size: f64, gap: f64) -> f64 {
    if cells <= 0 {
        return 0.0;
    }
    f64::from(cells) * cell_size + f64::from(cells - 1) * gap
}

// ============================================================================
// Render Output
// ============================================================================

/// One widget ready for the host to draw.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedWidget {
    pub id: WidgetId,
    pub instance: WidgetInstance,
    pub cells: GridRect,
    pub span: TrackSpan,
    pub rect: ScreenRect,
}

/// The live drag/resize preview.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedPreview {
    pub id: WidgetId,
    pub cells: GridRect,
    pub rect: ScreenRect,
    pub valid: bool,
}

/// Everything the host needs to draw one frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub widgets: SmallVec<[RenderedWidget; RENDER_INLINE_CAP]>,
    pub preview: Option<RenderedPreview>,
    pub cell_size: f64,
    pub canvas_height: f64,
}

/// Keeps the latest grid metrics and produces render frames.
#[derive(Clone, Debug)]
pub struct GridRenderer {
    metrics: GridMetrics,
}

impl GridRenderer {
    #[must_use]
    pub const fn new(metrics: GridMetrics) -> Self { Self { metrics } }

    #[must_use]
    pub const fn metrics(&self) -> &GridMetrics { &self.metrics }

    /// Recomputes the cell size for a new viewport width.
    ///
    /// Returns `true` if the cell size changed. Calling it twice with the
    /// same width is a no-op.
    pub fn resize(&mut self, width: f64) -> bool {
        let cell_size = cell_size_for_width(width, self.metrics.dims.cols, self.metrics.gap);
        if (cell_size - self.metrics.cell_size).abs() < f64::EPSILON {
            return false;
        }
        tracing::trace!(width, cell_size, "grid cell size changed");
        self.metrics.cell_size = cell_size;
        true
    }

    /// Moves the canvas origin used for pointer conversion.
    pub const fn set_origin(&mut self, origin: ScreenPoint) { self.metrics.origin = origin; }

    /// Builds a frame from the committed layout and the active preview.
    ///
    /// Widgets are emitted in layout order. A placement without a matching
    /// instance is skipped.
    #[must_use]
    pub fn render(
        &self,
        layout: &LayoutStore,
        registry: &WidgetRegistry,
        preview: Option<&PreviewRect>,
    ) -> RenderFrame {
        let widgets = layout
            .iter()
            .filter_map(|placement| {
                let instance = registry.find(&placement.id)?;
                let cells = placement.rect();
                Some(RenderedWidget {
                    id: placement.id.clone(),
                    instance: instance.clone(),
                    cells,
                    span: TrackSpan::of(&cells),
                    rect: self.metrics.to_screen(&cells),
                })
            })
            .collect();

        let preview = preview.map(|p| RenderedPreview {
            id: p.id.clone(),
            cells: p.rect,
            rect: self.metrics.to_screen(&p.rect),
            valid: p.valid,
        });

        RenderFrame {
            widgets,
            preview,
            cell_size: self.metrics.cell_size,
            canvas_height: self.metrics.canvas_height(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: GridDimensions = GridDimensions::new(12, 8);

    fn approx_eq(a: f64, b: f64) -> bool { (a - b).abs() < 0.001 }

    // 12 cells of 100px and 13 gaps of 16px
    fn metrics() -> GridMetrics { GridMetrics::for_width(GRID, 16.0, 1408.0) }

    #[test]
    fn test_cell_size_from_width() {
        assert!(approx_eq(metrics().cell_size, 100.0));
        assert!(approx_eq(cell_size_for_width(100.0, 12, 16.0), 0.0));
        assert!(approx_eq(cell_size_for_width(500.0, 0, 16.0), 0.0));
    }

    #[test]
    fn test_to_screen() {
        let rect = metrics().to_screen(&GridRect::new(1, 2, 3, 2));
        assert!(approx_eq(rect.left, 132.0));
        assert!(approx_eq(rect.top, 248.0));
        assert!(approx_eq(rect.width, 332.0));
        assert!(approx_eq(rect.height, 216.0));
    }

    #[test]
    fn test_full_width_placement_fills_canvas() {
        let m = metrics();
        let rect = m.to_screen(&GridRect::new(0, 0, 12, 1));
        assert!(approx_eq(rect.left + rect.width + m.gap, 1408.0));
    }

    #[test]
    fn test_canvas_height() {
        assert!(approx_eq(metrics().canvas_height(), 8.0 * 100.0 + 9.0 * 16.0));
    }

    #[test]
    fn test_track_span() {
        let span = TrackSpan::of(&GridRect::new(4, 2, 4, 4));
        assert_eq!(
            span,
            TrackSpan { column_start: 5, column_end: 9, row_start: 3, row_end: 7 }
        );
    }

    #[test]
    fn test_cell_at_floors_and_clamps() {
        let m = metrics().with_origin(ScreenPoint::new(10.0, 20.0));
        assert_eq!(m.cell_at(ScreenPoint::new(10.0, 20.0)), GridPoint::new(0, 0));
        assert_eq!(m.cell_at(ScreenPoint::new(10.0 + 115.9, 20.0 + 116.0)), GridPoint::new(0, 1));
        assert_eq!(m.cell_at(ScreenPoint::new(-500.0, -500.0)), GridPoint::new(0, 0));
        assert_eq!(m.cell_at(ScreenPoint::new(5000.0, 5000.0)), GridPoint::new(11, 7));
    }

    #[test]
    fn test_cell_center_maps_back_to_cell() {
        let m = metrics().with_origin(ScreenPoint::new(40.0, 8.0));
        let center = m.cell_center(GridPoint::new(3, 2));
        assert!(approx_eq(center.x, 40.0 + 3.0 * 116.0 + 16.0 + 50.0));
        assert_eq!(m.cell_at(center), GridPoint::new(3, 2));
    }

    #[test]
    fn test_cells_for_delta_rounds() {
        let m = metrics();
        assert_eq!(m.cells_for_delta(57.0), 0);
        assert_eq!(m.cells_for_delta(59.0), 1);
        assert_eq!(m.cells_for_delta(-175.0), -2);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut renderer = GridRenderer::new(metrics());
        assert!(!renderer.resize(1408.0));
        assert!(renderer.resize(2816.0));
        assert!(!renderer.resize(2816.0));
        assert!(approx_eq(renderer.metrics().cell_size, (2816.0 - 208.0) / 12.0));
    }
}
