//! The widget grid: placements, geometry, gestures and rendering.
//!
//! [`Session`] is the entry point. The other modules are the pieces it is
//! built from and can be used on their own.

pub mod error;
pub mod geometry;
pub mod interaction;
pub mod layout_store;
pub mod placement;
pub mod registry;
pub mod renderer;
pub mod session;
pub mod types;

pub use error::{LayoutError, SessionError, SessionResult};
pub use geometry::{in_bounds, is_valid_placement, overlaps};
pub use interaction::{
    DragOperation, InteractionController, InteractionOutcome, InteractionState, NoopBinder,
    PointerBinder, PointerBinding, PointerDown, PreviewRect,
};
pub use layout_store::LayoutStore;
pub use placement::{PlacementSearch, find_free_position, search_free_position};
pub use registry::WidgetRegistry;
pub use renderer::{
    GridMetrics, GridRenderer, RenderFrame, RenderedPreview, RenderedWidget, ScreenPoint,
    ScreenRect, TrackSpan,
};
pub use session::{Session, SessionOptions};
pub use types::{GridDimensions, GridPoint, GridRect, GridSize, Placement, WidgetId};
