//! Collision and bounds checks on the cell grid.
//!
//! These functions are pure and cheap; the interaction controller calls
//! `is_valid_placement` on every pointer move.

use super::types::{GridDimensions, GridRect, Placement, WidgetId};

/// Returns `true` if the two rectangles share at least one cell.
///
/// Rectangles that only touch along an edge do not overlap.
#[must_use]
pub const fn overlaps(a: &GridRect, b: &GridRect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

/// Returns `true` if `rect` lies entirely inside a `cols` × `rows` grid.
#[must_use]
pub const fn in_bounds(rect: &GridRect, dims: GridDimensions) -> bool {
    rect.x >= 0 && rect.y >= 0 && rect.x + rect.w <= dims.cols && rect.y + rect.h <= dims.rows
}

/// Returns `true` if `candidate` is inside the grid and collides with no
/// placement other than the one identified by `exclude`.
#[must_use]
pub fn is_valid_placement<'a, I>(
    placements: I,
    exclude: Option<&WidgetId>,
    candidate: &GridRect,
    dims: GridDimensions,
) -> bool
where
    I: IntoIterator<Item = &'a Placement>,
{
    debug_assert!(
        candidate.w >= 0 && candidate.h >= 0,
        "candidate size must not be negative"
    );

    if !in_bounds(candidate, dims) {
        return false;
    }

    placements
        .into_iter()
        .filter(|p| exclude != Some(&p.id))
        .all(|p| !overlaps(&p.rect(), candidate))
}

// ============================================================================
// Tests
// ============================================================================
