//! Pointer-driven drag and resize state machine.
//!
//! # States
//!
//! ```text
//!            pointer_down(Move)              pointer_down(Resize)
//!   Dragging <────────────────── Idle ──────────────────> Resizing
//!      │  ▲                       ▲                         │  ▲
//!      │  └─ pointer_move         │                         │  └─ pointer_move
//!      └──── pointer_up/cancel ───┴──── pointer_up/cancel ──┘
//! ```
//!
//! Every pointer move recomputes the preview from the session anchor, never
//! from the previous preview, so dropped or reordered frames cannot drift.
//! Out-of-range candidates are clamped first and only then checked for
//! overlap; an overlapping preview is flagged `valid: false` and discarded
//! if the pointer is released on it.
//!
//! While a session is active the host's global pointer handlers are held by
//! a [`PointerBinding`]. The binding is released when the session ends, on
//! every path.

use std::fmt;

use serde::Serialize;

use super::geometry::is_valid_placement;
use super::layout_store::LayoutStore;
use super::renderer::{GridMetrics, ScreenPoint};
use super::types::{GridDimensions, GridRect, GridSize, Placement, WidgetId};

// ============================================================================
// Operation Types
// ============================================================================

/// The affordance a gesture started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragOperation {
    /// The widget's drag handle: position changes, size is fixed.
    Move,
    /// The widget's resize corner: size changes, top-left is fixed.
    Resize,
}

/// A pointer-down on a widget affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerDown {
    pub id: WidgetId,
    pub operation: DragOperation,
    pub position: ScreenPoint,
}

impl PointerDown {
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, operation: DragOperation, position: ScreenPoint) -> Self {
        Self { id: id.into(), operation, position }
    }
}

/// The live candidate shown while a gesture is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRect {
    pub id: WidgetId,
    pub rect: GridRect,
    pub valid: bool,
}

// ============================================================================
// Pointer Binding
// ============================================================================

/// Registers global pointer-move/up handlers for the duration of a gesture.
///
/// Implemented by the host. The returned guard unregisters the handlers when
/// dropped.
pub trait PointerBinder {
    fn bind(&self, id: &WidgetId, operation: DragOperation) -> PointerBinding;
}

/// Binder for hosts that deliver pointer events without registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBinder;

impl PointerBinder for NoopBinder {
    fn bind(&self, _id: &WidgetId, _operation: DragOperation) -> PointerBinding {
        PointerBinding::noop()
    }
}

/// Guard for registered pointer handlers; runs its release hook on drop.
pub struct PointerBinding {
    release: Option<Box<dyn FnOnce()>>,
}

impl PointerBinding {
    /// A binding that runs `release` when dropped.
    #[must_use]
    pub fn new(release: impl FnOnce() + 'static) -> Self { Self { release: Some(Box::new(release)) } }

    /// A binding with nothing to release.
    #[must_use]
    pub const fn noop() -> Self { Self { release: None } }
}

impl Drop for PointerBinding {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for PointerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerBinding").field("bound", &self.release.is_some()).finish()
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// An in-progress move gesture.
#[derive(Debug)]
pub struct DragSession {
    pub placement_id: WidgetId,
    pub anchor: ScreenPoint,
    pub original_x: i32,
    pub original_y: i32,
    pub w: i32,
    pub h: i32,
    preview: PreviewRect,
    _binding: PointerBinding,
}

impl DragSession {
    fn candidate(&self, pointer: ScreenPoint, metrics: &GridMetrics) -> GridRect {
        let dims = metrics.dims;
        let cell = metrics.cell_at(pointer);
        let x = cell.x.min(dims.cols - self.w).max(0);
        let y = cell.y.min(dims.rows - self.h).max(0);
        GridRect::new(x, y, self.w, self.h)
    }
}

/// An in-progress resize gesture.
#[derive(Debug)]
pub struct ResizeSession {
    pub placement_id: WidgetId,
    pub anchor: ScreenPoint,
    pub original_w: i32,
    pub original_h: i32,
    pub x: i32,
    pub y: i32,
    pub min_size: GridSize,
    preview: PreviewRect,
    _binding: PointerBinding,
}

impl ResizeSession {
    fn candidate(&self, pointer: ScreenPoint, metrics: &GridMetrics) -> GridRect {
        let dims = metrics.dims;
        let dx = metrics.cells_for_delta(pointer.x - self.anchor.x);
        let dy = metrics.cells_for_delta(pointer.y - self.anchor.y);
        // The floor wins over the grid edge; an oversized floor yields an
        // out-of-bounds, invalid preview.
        let w = (self.original_w + dx).min(dims.cols - self.x).max(self.min_size.w);
        let h = (self.original_h + dy).min(dims.rows - self.y).max(self.min_size.h);
        GridRect::new(self.x, self.y, w, h)
    }
}

/// Current state of the controller.
#[derive(Debug, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl InteractionState {
    fn preview(&self) -> Option<&PreviewRect> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(&session.preview),
            Self::Resizing(session) => Some(&session.preview),
        }
    }

    fn preview_mut(&mut self) -> Option<&mut PreviewRect> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(&mut session.preview),
            Self::Resizing(session) => Some(&mut session.preview),
        }
    }
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// There was no active gesture.
    Idle,
    /// The preview was valid and written to the layout store.
    Committed(Placement),
    /// The preview was invalid; the placement kept its original rectangle.
    Discarded(WidgetId),
    /// The placement disappeared during the gesture; nothing was written.
    Aborted(WidgetId),
}

impl InteractionOutcome {
    #[must_use]
    pub const fn is_committed(&self) -> bool { matches!(self, Self::Committed(_)) }
}

// ============================================================================
// Controller
// ============================================================================

/// Converts pointer events into drag and resize gestures on the layout.
pub struct InteractionController {
    state: InteractionState,
    binder: Box<dyn PointerBinder>,
}

impl Default for InteractionController {
    fn default() -> Self { Self::new(Box::new(NoopBinder)) }
}

impl fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionController").field("state", &self.state).finish_non_exhaustive()
    }
}

impl InteractionController {
    /// Create an idle controller that binds pointer handlers through `binder`.
    #[must_use]
    pub fn new(binder: Box<dyn PointerBinder>) -> Self {
        Self { state: InteractionState::Idle, binder }
    }

    #[must_use]
    pub const fn state(&self) -> &InteractionState { &self.state }

    /// Returns `true` while a drag or resize is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool { !matches!(self.state, InteractionState::Idle) }

    /// The current preview, if a gesture is in progress.
    #[must_use]
    pub fn preview(&self) -> Option<&PreviewRect> { self.state.preview() }

    /// Starts a gesture on the affordance under the pointer.
    ///
    /// Ignored (returns `false`) when editing is disabled, when another
    /// gesture is already active, or when the placement does not exist.
    /// `min_size` is the resize floor for the widget's type.
    pub fn pointer_down(
        &mut self,
        event: &PointerDown,
        layout: &LayoutStore,
        min_size: GridSize,
        editing: bool,
    ) -> bool {
        if !editing {
            tracing::trace!(id = %event.id, "pointer down ignored, editing disabled");
            return false;
        }
        if self.is_active() {
            tracing::debug!(id = %event.id, "pointer down ignored, gesture already active");
            return false;
        }
        let Some(placement) = layout.find(&event.id) else {
            tracing::debug!(id = %event.id, "pointer down on unknown placement");
            return false;
        };

        let rect = placement.rect();
        let preview = PreviewRect { id: placement.id.clone(), rect, valid: true };
        let binding = self.binder.bind(&placement.id, event.operation);

        self.state = match event.operation {
            DragOperation::Move => InteractionState::Dragging(DragSession {
                placement_id: placement.id.clone(),
                anchor: event.position,
                original_x: rect.x,
                original_y: rect.y,
                w: rect.w,
                h: rect.h,
                preview,
                _binding: binding,
            }),
            DragOperation::Resize => InteractionState::Resizing(ResizeSession {
                placement_id: placement.id.clone(),
                anchor: event.position,
                original_w: rect.w,
                original_h: rect.h,
                x: rect.x,
                y: rect.y,
                min_size,
                preview,
                _binding: binding,
            }),
        };

        tracing::trace!(id = %event.id, operation = ?event.operation, "gesture started");
        true
    }

    /// Recomputes the preview for a new pointer position.
    ///
    /// Uses `metrics` for the pixel-to-cell conversion, so a viewport resize
    /// mid-gesture takes effect on the next move. Returns the updated
    /// preview, or `None` when idle. If the placement has vanished from the
    /// layout the gesture is dropped silently.
    pub fn pointer_move(
        &mut self,
        position: ScreenPoint,
        layout: &LayoutStore,
        metrics: &GridMetrics,
    ) -> Option<&PreviewRect> {
        let (id, candidate) = match &self.state {
            InteractionState::Idle => return None,
            InteractionState::Dragging(session) => {
                (session.placement_id.clone(), session.candidate(position, metrics))
            }
            InteractionState::Resizing(session) => {
                (session.placement_id.clone(), session.candidate(position, metrics))
            }
        };

        if !layout.contains(&id) {
            tracing::debug!(id = %id, "placement vanished mid-gesture, resetting");
            self.state = InteractionState::Idle;
            return None;
        }

        let valid = is_valid_placement(layout.iter(), Some(&id), &candidate, metrics.dims);
        let preview = self.state.preview_mut()?;
        preview.rect = candidate;
        preview.valid = valid;
        Some(&*preview)
    }

    /// Ends the gesture: commits a valid preview, discards an invalid one.
    pub fn pointer_up(&mut self, layout: &mut LayoutStore, dims: GridDimensions) -> InteractionOutcome {
        let state = std::mem::take(&mut self.state);
        let Some(preview) = state.preview().cloned() else {
            return InteractionOutcome::Idle;
        };
        // Dropping the session releases the pointer binding.
        drop(state);

        if !layout.contains(&preview.id) {
            tracing::debug!(id = %preview.id, "placement vanished before release, resetting");
            return InteractionOutcome::Aborted(preview.id);
        }

        let still_valid = preview.valid
            && is_valid_placement(layout.iter(), Some(&preview.id), &preview.rect, dims);
        if !still_valid {
            tracing::debug!(id = %preview.id, rect = ?preview.rect, "gesture discarded");
            return InteractionOutcome::Discarded(preview.id);
        }

        layout.update_rect(&preview.id, preview.rect);
        tracing::trace!(id = %preview.id, rect = ?preview.rect, "gesture committed");
        InteractionOutcome::Committed(Placement::new(preview.id, preview.rect))
    }

    /// Resolves a gesture whose pointer capture was lost.
    ///
    /// Behaves exactly like a pointer-up at the last known position.
    pub fn cancel(&mut self, layout: &mut LayoutStore, dims: GridDimensions) -> InteractionOutcome {
        if self.is_active() {
            tracing::debug!("pointer capture lost, resolving gesture");
        }
        self.pointer_up(layout, dims)
    }

    /// Drops any active gesture without touching the layout.
    pub fn reset(&mut self) {
        if let Some(preview) = self.state.preview() {
            tracing::debug!(id = %preview.id, "gesture reset");
        }
        self.state = InteractionState::Idle;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    const GRID: GridDimensions = GridDimensions::new(12, 8);
    const MIN: GridSize = GridSize::new(2, 2);

    // 100px cells with 16px gaps: cell n starts at n * 116 (+ gap)
    fn metrics() -> GridMetrics { GridMetrics::for_width(GRID, 16.0, 1408.0) }

    fn at_cell(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint::new(f64::from(x) * 116.0 + 50.0, f64::from(y) * 116.0 + 50.0)
    }

    fn layout(placements: &[(&str, i32, i32, i32, i32)]) -> LayoutStore {
        LayoutStore::with_placements(
            placements.iter().map(|&(id, x, y, w, h)| Placement::new(id, GridRect::new(x, y, w, h))),
        )
    }

    fn start(
        controller: &mut InteractionController,
        layout: &LayoutStore,
        id: &str,
        operation: DragOperation,
        position: ScreenPoint,
    ) -> bool {
        controller.pointer_down(&PointerDown::new(id, operation, position), layout, MIN, true)
    }

    struct CountingBinder {
        bound: Rc<Cell<u32>>,
        released: Rc<Cell<u32>>,
    }

    impl PointerBinder for CountingBinder {
        fn bind(&self, _id: &WidgetId, _operation: DragOperation) -> PointerBinding {
            self.bound.set(self.bound.get() + 1);
            let released = Rc::clone(&self.released);
            PointerBinding::new(move || released.set(released.get() + 1))
        }
    }

    fn counting_controller() -> (InteractionController, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let bound = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(0));
        let binder = CountingBinder { bound: Rc::clone(&bound), released: Rc::clone(&released) };
        (InteractionController::new(Box::new(binder)), bound, released)
    }

    #[test]
    fn test_pointer_down_starts_drag_with_valid_preview() {
        let store = layout(&[("a", 1, 1, 2, 2)]);
        let mut controller = InteractionController::default();

        assert!(start(&mut controller, &store, "a", DragOperation::Move, at_cell(1, 1)));
        assert!(matches!(controller.state(), InteractionState::Dragging(_)));

        let preview = controller.preview().unwrap();
        assert_eq!(preview.rect, GridRect::new(1, 1, 2, 2));
        assert!(preview.valid);
    }

    #[test]
    fn test_pointer_down_requires_editing() {
        let store = layout(&[("a", 0, 0, 2, 2)]);
        let mut controller = InteractionController::default();
        let event = PointerDown::new("a", DragOperation::Move, at_cell(0, 0));

        assert!(!controller.pointer_down(&event, &store, MIN, false));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_pointer_down_on_unknown_placement_is_ignored() {
        let store = layout(&[]);
        let mut controller = InteractionController::default();
        assert!(!start(&mut controller, &store, "ghost", DragOperation::Move, at_cell(0, 0)));
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let store = layout(&[("a", 0, 0, 2, 2), ("b", 4, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        assert!(start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0)));
        assert!(!start(&mut controller, &store, "b", DragOperation::Resize, at_cell(5, 1)));

        let InteractionState::Dragging(session) = controller.state() else {
            panic!("expected drag session");
        };
        assert_eq!(session.placement_id.as_str(), "a");
    }

    #[test]
    fn test_drag_commits_valid_preview() {
        let mut store = layout(&[("a", 0, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        let preview = controller.pointer_move(at_cell(5, 3), &store, &metrics()).unwrap();
        assert_eq!(preview.rect, GridRect::new(5, 3, 2, 2));
        assert!(preview.valid);

        let outcome = controller.pointer_up(&mut store, GRID);
        assert!(outcome.is_committed());
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(5, 3, 2, 2));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_drag_onto_neighbour_is_discarded() {
        let mut store = layout(&[("a", 0, 0, 2, 2), ("b", 2, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        let preview = controller.pointer_move(at_cell(2, 0), &store, &metrics()).unwrap();
        assert_eq!(preview.rect, GridRect::new(2, 0, 2, 2));
        assert!(!preview.valid);

        let outcome = controller.pointer_up(&mut store, GRID);
        assert_eq!(outcome, InteractionOutcome::Discarded("a".into()));
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(0, 0, 2, 2));
    }

    #[test]
    fn test_invalid_preview_can_become_valid_again() {
        let mut store = layout(&[("a", 0, 0, 2, 2), ("b", 2, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        assert!(!controller.pointer_move(at_cell(3, 0), &store, &metrics()).unwrap().valid);
        assert!(controller.pointer_move(at_cell(6, 0), &store, &metrics()).unwrap().valid);

        assert!(controller.pointer_up(&mut store, GRID).is_committed());
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(6, 0, 2, 2));
    }

    #[test]
    fn test_drag_clamps_before_validating() {
        let store = layout(&[("a", 0, 0, 4, 4)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        let preview = controller.pointer_move(at_cell(10, 7), &store, &metrics()).unwrap();
        assert_eq!(preview.rect, GridRect::new(8, 4, 4, 4));
        assert!(preview.valid);
    }

    #[test]
    fn test_drag_pointer_outside_grid_is_clamped() {
        let store = layout(&[("a", 3, 3, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(3, 3));
        let preview =
            controller.pointer_move(ScreenPoint::new(-300.0, -300.0), &store, &metrics()).unwrap();
        assert_eq!(preview.rect, GridRect::new(0, 0, 2, 2));
    }

    #[test]
    fn test_resize_grows_and_commits() {
        let mut store = layout(&[("a", 1, 1, 2, 2)]);
        let mut controller = InteractionController::default();
        let anchor = ScreenPoint::new(300.0, 300.0);

        start(&mut controller, &store, "a", DragOperation::Resize, anchor);
        let preview = controller
            .pointer_move(ScreenPoint::new(300.0 + 232.0, 300.0 + 116.0), &store, &metrics())
            .unwrap();
        assert_eq!(preview.rect, GridRect::new(1, 1, 4, 3));

        assert!(controller.pointer_up(&mut store, GRID).is_committed());
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(1, 1, 4, 3));
    }

    #[test]
    fn test_resize_floor_holds_for_large_negative_delta() {
        let mut store = layout(&[("a", 2, 2, 5, 5)]);
        let mut controller = InteractionController::default();
        let anchor = ScreenPoint::new(800.0, 800.0);

        start(&mut controller, &store, "a", DragOperation::Resize, anchor);
        let preview = controller
            .pointer_move(ScreenPoint::new(-10_000.0, -10_000.0), &store, &metrics())
            .unwrap();
        assert_eq!(preview.rect.size(), MIN);
        assert!(preview.valid);

        controller.pointer_up(&mut store, GRID);
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(2, 2, 2, 2));
    }

    #[test]
    fn test_resize_clamps_at_grid_edge() {
        let store = layout(&[("a", 9, 5, 2, 2)]);
        let mut controller = InteractionController::default();
        let anchor = ScreenPoint::new(0.0, 0.0);

        start(&mut controller, &store, "a", DragOperation::Resize, anchor);
        let preview = controller
            .pointer_move(ScreenPoint::new(5000.0, 5000.0), &store, &metrics())
            .unwrap();
        assert_eq!(preview.rect, GridRect::new(9, 5, 3, 3));
        assert!(preview.valid);
    }

    #[test]
    fn test_resize_into_neighbour_is_discarded() {
        let mut store = layout(&[("a", 0, 0, 2, 2), ("b", 3, 0, 2, 2)]);
        let mut controller = InteractionController::default();
        let anchor = ScreenPoint::new(200.0, 200.0);

        start(&mut controller, &store, "a", DragOperation::Resize, anchor);
        let preview = controller
            .pointer_move(ScreenPoint::new(200.0 + 232.0, 200.0), &store, &metrics())
            .unwrap();
        assert!(!preview.valid);

        assert_eq!(controller.pointer_up(&mut store, GRID), InteractionOutcome::Discarded("a".into()));
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(0, 0, 2, 2));
    }

    #[test]
    fn test_moves_are_recomputed_from_anchor() {
        let store = layout(&[("a", 0, 0, 2, 2)]);
        let mut controller = InteractionController::default();
        let anchor = ScreenPoint::new(100.0, 100.0);

        start(&mut controller, &store, "a", DragOperation::Resize, anchor);
        let target = ScreenPoint::new(100.0 + 116.0, 100.0);
        for _ in 0..5 {
            controller.pointer_move(target, &store, &metrics());
        }
        assert_eq!(controller.preview().unwrap().rect, GridRect::new(0, 0, 3, 2));
    }

    #[test]
    fn test_vanished_placement_resets_silently() {
        let mut store = layout(&[("a", 0, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        store.remove(&"a".into());

        assert!(controller.pointer_move(at_cell(4, 4), &store, &metrics()).is_none());
        assert!(!controller.is_active());
        assert_eq!(controller.pointer_up(&mut store, GRID), InteractionOutcome::Idle);
    }

    #[test]
    fn test_vanished_placement_on_release_aborts() {
        let mut store = layout(&[("a", 0, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        store.remove(&"a".into());

        assert_eq!(controller.pointer_up(&mut store, GRID), InteractionOutcome::Aborted("a".into()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_cancel_commits_last_valid_preview() {
        let mut store = layout(&[("a", 0, 0, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        controller.pointer_move(at_cell(7, 2), &store, &metrics());

        assert!(controller.cancel(&mut store, GRID).is_committed());
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(7, 2, 2, 2));
    }

    #[test]
    fn test_pointer_up_without_move_keeps_placement() {
        let mut store = layout(&[("a", 3, 3, 2, 2)]);
        let mut controller = InteractionController::default();

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(3, 3));
        assert!(controller.pointer_up(&mut store, GRID).is_committed());
        assert_eq!(store.get(&"a".into()).unwrap().rect(), GridRect::new(3, 3, 2, 2));
    }

    #[test]
    fn test_binding_released_on_every_exit_path() {
        let (mut controller, bound, released) = counting_controller();
        let mut store = layout(&[("a", 0, 0, 2, 2), ("b", 2, 0, 2, 2)]);

        // Commit
        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        assert_eq!((bound.get(), released.get()), (1, 0));
        controller.pointer_up(&mut store, GRID);
        assert_eq!(released.get(), 1);

        // Discard
        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        controller.pointer_move(at_cell(2, 0), &store, &metrics());
        controller.pointer_up(&mut store, GRID);
        assert_eq!(released.get(), 2);

        // Capture loss
        start(&mut controller, &store, "a", DragOperation::Resize, at_cell(1, 1));
        controller.cancel(&mut store, GRID);
        assert_eq!(released.get(), 3);

        // Silent reset
        start(&mut controller, &store, "b", DragOperation::Move, at_cell(2, 0));
        store.remove(&"b".into());
        controller.pointer_move(at_cell(6, 6), &store, &metrics());
        assert_eq!(released.get(), 4);

        // Explicit reset
        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        controller.reset();
        assert_eq!((bound.get(), released.get()), (5, 5));
    }

    #[test]
    fn test_ignored_pointer_down_does_not_bind() {
        let (mut controller, bound, _released) = counting_controller();
        let store = layout(&[("a", 0, 0, 2, 2)]);

        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        start(&mut controller, &store, "a", DragOperation::Move, at_cell(0, 0));
        assert_eq!(bound.get(), 1);
    }
}
