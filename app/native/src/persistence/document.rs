//! The persisted settings document.
//!
//! Keys missing from a stored document fall back to the defaults, so older
//! files keep loading as fields are added.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::SETTINGS_VERSION;
use crate::grid::{GridRect, Placement, WidgetId};
use crate::widgets::{
    ClockSettings, ClockStyle, QuoteKind, QuoteSettings, WeatherSettings, WidgetDataMap,
    WidgetInstance, WidgetSettings,
};

/// UI state stored alongside the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiSettings {
    /// Whether drag and resize affordances are active.
    pub edit_mode: bool,
}

/// Everything the start page persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredSettings {
    pub version: u32,
    pub widget_instances: Vec<WidgetInstance>,
    pub layout: Vec<Placement>,
    pub widget_data: WidgetDataMap,
    pub ui: UiSettings,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            widget_instances: vec![
                WidgetInstance::new(
                    WidgetId::new("clock-1"),
                    WidgetSettings::Clock(ClockSettings { style: ClockStyle::DigitalLarge }),
                ),
                WidgetInstance::new(
                    WidgetId::new("weather-1"),
                    WidgetSettings::Weather(WeatherSettings::default()),
                ),
                WidgetInstance::new(
                    WidgetId::new("quote-1"),
                    WidgetSettings::Quote(QuoteSettings { kind: QuoteKind::Bible }),
                ),
            ],
            layout: vec![
                Placement::new("clock-1", GridRect::new(4, 2, 4, 4)),
                Placement::new("weather-1", GridRect::new(0, 0, 3, 4)),
                Placement::new("quote-1", GridRect::new(3, 6, 6, 2)),
            ],
            widget_data: WidgetDataMap::new(),
            ui: UiSettings::default(),
        }
    }
}

impl StoredSettings {
    /// An empty board with no widgets.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            widget_instances: Vec::new(),
            layout: Vec::new(),
            ..Self::default()
        }
    }

    /// Drops entries that would break the instance/placement pairing.
    ///
    /// Removes duplicate ids, instances without a placement, placements
    /// without an instance and data stored for unknown widgets. Both lists
    /// keep their stored order. Returns the number of entries dropped.
    pub fn reconcile(&mut self) -> usize {
        let before = self.widget_instances.len() + self.layout.len();

        let mut seen = HashSet::new();
        self.widget_instances.retain(|instance| {
            let fresh = seen.insert(instance.id.clone());
            if !fresh {
                tracing::warn!(id = %instance.id, "dropping duplicate widget instance");
            }
            fresh
        });

        let mut placed = HashSet::new();
        let instance_ids = seen;
        self.layout.retain(|placement| {
            if !instance_ids.contains(&placement.id) {
                tracing::warn!(id = %placement.id, "dropping placement without widget instance");
                return false;
            }
            let fresh = placed.insert(placement.id.clone());
            if !fresh {
                tracing::warn!(id = %placement.id, "dropping duplicate placement");
            }
            fresh
        });

        self.widget_instances.retain(|instance| {
            let keep = placed.contains(&instance.id);
            if !keep {
                tracing::warn!(id = %instance.id, "dropping widget instance without placement");
            }
            keep
        });

        let data_before = self.widget_data.len();
        self.widget_data.retain(|id| {
            let keep = placed.contains(id);
            if !keep {
                tracing::warn!(id = %id, "dropping data of unknown widget");
            }
            keep
        });

        before + data_before
            - (self.widget_instances.len() + self.layout.len() + self.widget_data.len())
    }
}
