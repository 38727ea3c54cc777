//! Widget instance types.
//!
//! Each widget type carries its own settings struct. On the wire an instance
//! is `{ "id", "type", "settings" }`, matching the settings document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::grid::{GridSize, WidgetId};

// ============================================================================
// Widget Type
// ============================================================================

/// The kind of content a widget renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Clock,
    Weather,
    Quote,
    Bookmarks,
    Todo,
    Sticky,
    Kanban,
}

impl WidgetType {
    /// Every widget type, in gallery order.
    pub const ALL: [Self; 7] = [
        Self::Clock,
        Self::Weather,
        Self::Quote,
        Self::Bookmarks,
        Self::Todo,
        Self::Sticky,
        Self::Kanban,
    ];

    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Weather => "weather",
            Self::Quote => "quote",
            Self::Bookmarks => "bookmarks",
            Self::Todo => "todo",
            Self::Sticky => "sticky",
            Self::Kanban => "kanban",
        }
    }

    /// Size given to a freshly added widget.
    #[must_use]
    pub const fn default_size(self) -> GridSize {
        match self {
            Self::Clock => GridSize::new(4, 4),
            Self::Weather | Self::Todo => GridSize::new(3, 4),
            Self::Quote => GridSize::new(6, 2),
            Self::Bookmarks => GridSize::new(4, 3),
            Self::Sticky => GridSize::new(3, 3),
            Self::Kanban => GridSize::new(6, 4),
        }
    }

    /// Smallest size a resize may produce.
    #[must_use]
    pub const fn min_size(self) -> GridSize {
        match self {
            Self::Clock | Self::Bookmarks | Self::Sticky => GridSize::new(2, 2),
            Self::Weather | Self::Todo => GridSize::new(2, 3),
            Self::Quote => GridSize::new(3, 2),
            Self::Kanban => GridSize::new(4, 3),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for WidgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower).ok_or_else(|| {
            let names: Vec<_> = Self::ALL.iter().map(|t| t.as_str()).collect();
            format!("unknown widget type '{s}', expected one of: {}", names.join(", "))
        })
    }
}

// ============================================================================
// Per-Type Settings
// ============================================================================

/// Clock face style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockStyle {
    #[default]
    DigitalLarge,
    DigitalSmall,
    Analog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockSettings {
    pub style: ClockStyle,
}

/// Temperature unit system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherUnit {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherSettings {
    pub unit: WeatherUnit,
}

/// Source of the daily quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteKind {
    #[default]
    Bible,
    Quote,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuoteSettings {
    #[serde(rename = "type")]
    pub kind: QuoteKind,
}

/// Icon size for bookmark tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookmarksSettings {
    pub size: BookmarkSize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoSettings {}

/// Sticky note paper color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickyColor {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
    Orange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StickySettings {
    pub color: StickyColor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KanbanSettings {}

// ============================================================================
// Widget Settings
// ============================================================================

/// Settings for one widget, tagged by its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "settings", rename_all = "lowercase")]
pub enum WidgetSettings {
    Clock(ClockSettings),
    Weather(WeatherSettings),
    Quote(QuoteSettings),
    Bookmarks(BookmarksSettings),
    Todo(TodoSettings),
    Sticky(StickySettings),
    Kanban(KanbanSettings),
}

impl WidgetSettings {
    /// Default settings for `kind`.
    #[must_use]
    pub fn default_for(kind: WidgetType) -> Self {
        match kind {
            WidgetType::Clock => Self::Clock(ClockSettings::default()),
            WidgetType::Weather => Self::Weather(WeatherSettings::default()),
            WidgetType::Quote => Self::Quote(QuoteSettings::default()),
            WidgetType::Bookmarks => Self::Bookmarks(BookmarksSettings::default()),
            WidgetType::Todo => Self::Todo(TodoSettings::default()),
            WidgetType::Sticky => Self::Sticky(StickySettings::default()),
            WidgetType::Kanban => Self::Kanban(KanbanSettings::default()),
        }
    }

    /// Parses the settings object of a widget of type `kind`.
    ///
    /// `null` yields the defaults for the type.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error if `value` does not fit the type's
    /// settings shape.
    pub fn from_value(kind: WidgetType, value: Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default_for(kind));
        }
        Ok(match kind {
            WidgetType::Clock => Self::Clock(serde_json::from_value(value)?),
            WidgetType::Weather => Self::Weather(serde_json::from_value(value)?),
            WidgetType::Quote => Self::Quote(serde_json::from_value(value)?),
            WidgetType::Bookmarks => Self::Bookmarks(serde_json::from_value(value)?),
            WidgetType::Todo => Self::Todo(serde_json::from_value(value)?),
            WidgetType::Sticky => Self::Sticky(serde_json::from_value(value)?),
            WidgetType::Kanban => Self::Kanban(serde_json::from_value(value)?),
        })
    }

    /// The settings object without its type tag.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let value = match self {
            Self::Clock(s) => serde_json::to_value(s),
            Self::Weather(s) => serde_json::to_value(s),
            Self::Quote(s) => serde_json::to_value(s),
            Self::Bookmarks(s) => serde_json::to_value(s),
            Self::Todo(s) => serde_json::to_value(s),
            Self::Sticky(s) => serde_json::to_value(s),
            Self::Kanban(s) => serde_json::to_value(s),
        };
        // Plain structs of enums always serialize.
        value.unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// The widget type these settings belong to.
    #[must_use]
    pub const fn widget_type(&self) -> WidgetType {
        match self {
            Self::Clock(_) => WidgetType::Clock,
            Self::Weather(_) => WidgetType::Weather,
            Self::Quote(_) => WidgetType::Quote,
            Self::Bookmarks(_) => WidgetType::Bookmarks,
            Self::Todo(_) => WidgetType::Todo,
            Self::Sticky(_) => WidgetType::Sticky,
            Self::Kanban(_) => WidgetType::Kanban,
        }
    }

    /// Shallow-merges `patch` over the current settings.
    ///
    /// Keys in `patch` replace the matching top-level keys; everything else
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged object no longer fits the settings
    /// shape of this widget type.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut current = match self.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            current.insert(key.clone(), value.clone());
        }
        Self::from_value(self.widget_type(), Value::Object(current))
    }
}

// ============================================================================
// Widget Instance
// ============================================================================

/// A widget on the board: identity plus typed settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawWidgetInstance", into = "RawWidgetInstance")]
pub struct WidgetInstance {
    pub id: WidgetId,
    pub settings: WidgetSettings,
}

impl WidgetInstance {
    #[must_use]
    pub const fn new(id: WidgetId, settings: WidgetSettings) -> Self { Self { id, settings } }

    #[must_use]
    pub const fn widget_type(&self) -> WidgetType { self.settings.widget_type() }
}

/// Wire shape of a widget instance.
#[derive(Serialize, Deserialize)]
struct RawWidgetInstance {
    id: WidgetId,
    #[serde(rename = "type")]
    kind: WidgetType,
    #[serde(default)]
    settings: Value,
}

impl From<RawWidgetInstance> for WidgetInstance {
    fn from(raw: RawWidgetInstance) -> Self {
        let settings = WidgetSettings::from_value(raw.kind, raw.settings).unwrap_or_else(|err| {
            tracing::warn!(id = %raw.id, kind = %raw.kind, error = %err, "invalid widget settings, using defaults");
            WidgetSettings::default_for(raw.kind)
        });
        Self { id: raw.id, settings }
    }
}

impl From<WidgetInstance> for RawWidgetInstance {
    fn from(instance: WidgetInstance) -> Self {
        Self {
            id: instance.id,
            kind: instance.settings.widget_type(),
            settings: instance.settings.to_value(),
        }
    }
}
