//! Free-position search for newly added widgets.
//!
//! Candidates are scanned in row-major order (top row first, left to right)
//! and the first free spot wins, so the result is fully determined by the
//! current placements.

use super::geometry::{in_bounds, overlaps};
use super::types::{GridDimensions, GridPoint, GridRect, GridSize, Placement};

/// Result of a free-position search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementSearch {
    /// A position where the rectangle fits without overlap.
    Free(GridPoint),
    /// No free position exists; the origin is returned and may overlap.
    Fallback(GridPoint),
}

impl PlacementSearch {
    /// The position to use, regardless of whether it was free.
    #[must_use]
    pub const fn point(self) -> GridPoint {
        match self {
            Self::Free(point) | Self::Fallback(point) => point,
        }
    }

    /// Returns `true` if the search had to fall back to the origin.
    #[must_use]
    pub const fn is_fallback(self) -> bool { matches!(self, Self::Fallback(_)) }
}

/// Finds the first free top-left position for a rectangle of `size`.
///
/// Falls back to `{0, 0}` when the grid has no room; see
/// [`search_free_position`] to tell the two outcomes apart.
#[must_use]
pub fn find_free_position<'a, I>(placements: I, size: GridSize, dims: GridDimensions) -> GridPoint
where
    I: IntoIterator<Item = &'a Placement>,
{
    search_free_position(placements, size, dims).point()
}

/// Row-major scan for a free position, reporting whether it fell back.
#[must_use]
pub fn search_free_position<'a, I>(
    placements: I,
    size: GridSize,
    dims: GridDimensions,
) -> PlacementSearch
where
    I: IntoIterator<Item = &'a Placement>,
{
    debug_assert!(size.w >= 0 && size.h >= 0, "size must not be negative");

    let occupied: Vec<GridRect> = placements.into_iter().map(Placement::rect).collect();

    for y in 0..=(dims.rows - size.h) {
        for x in 0..=(dims.cols - size.w) {
            let candidate = GridRect::from_parts(GridPoint::new(x, y), size);
            if in_bounds(&candidate, dims) && !occupied.iter().any(|r| overlaps(r, &candidate)) {
                return PlacementSearch::Free(candidate.origin());
            }
        }
    }

    tracing::debug!(
        w = size.w,
        h = size.h,
        occupied = occupied.len(),
        "no free grid position, falling back to origin"
    );
    PlacementSearch::Fallback(GridPoint::new(0, 0))
}

// ============================================================================
// Tests
// ============================================================================
