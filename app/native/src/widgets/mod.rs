//! Widget instances and their per-type settings.

pub mod data;
pub mod types;

pub use data::{WidgetDataMap, WidgetDataStore};
pub use types::{
    BookmarkSize, BookmarksSettings, ClockSettings, ClockStyle, KanbanSettings, QuoteKind,
    QuoteSettings, StickyColor, StickySettings, TodoSettings, WeatherSettings, WeatherUnit,
    WidgetInstance, WidgetSettings, WidgetType,
};
