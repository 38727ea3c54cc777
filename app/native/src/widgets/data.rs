//! Per-widget data storage.
//!
//! Widgets such as to-do lists or sticky notes keep content keyed by their
//! instance id. The grid never reads this content; it only asks for it to
//! be dropped when the owning widget is removed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grid::WidgetId;

/// Storage for opaque per-widget data.
pub trait WidgetDataStore {
    /// Drops any data stored under `id`. Missing keys are ignored.
    fn delete_by_key(&mut self, id: &WidgetId);
}

/// In-memory widget data, persisted as the `widgetData` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetDataMap(BTreeMap<WidgetId, Value>);

impl WidgetDataMap {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get(&self, id: &WidgetId) -> Option<&Value> { self.0.get(id) }

    /// Stores `value` under `id`, returning the previous value.
    pub fn insert(&mut self, id: WidgetId, value: Value) -> Option<Value> { self.0.insert(id, value) }

    /// Keeps only the entries whose key satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&WidgetId) -> bool) {
        self.0.retain(|id, _| keep(id));
    }

    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl WidgetDataStore for WidgetDataMap {
    fn delete_by_key(&mut self, id: &WidgetId) {
        if self.0.remove(id).is_some() {
            tracing::trace!(id = %id, "deleted widget data");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_delete_by_key() {
        let mut data = WidgetDataMap::new();
        data.insert(WidgetId::new("todo-1"), json!([{ "text": "milk", "done": false }]));
        data.insert(WidgetId::new("sticky-1"), json!({ "text": "hello" }));

        data.delete_by_key(&WidgetId::new("todo-1"));
        data.delete_by_key(&WidgetId::new("missing"));

        assert!(data.get(&WidgetId::new("todo-1")).is_none());
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_serializes_as_object() {
        let mut data = WidgetDataMap::new();
        data.insert(WidgetId::new("sticky-1"), json!({ "text": "hi" }));
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, json!({ "sticky-1": { "text": "hi" } }));
    }
}
