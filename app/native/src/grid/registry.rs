//! Ordered collection of widget instances.
//!
//! Instances share their ids with layout placements. The registry itself
//! only guards against duplicate ids; keeping it in lockstep with the
//! layout store is the session's job.

use eyeball_im::{ObservableVector, Vector, VectorSubscriber};

use super::types::WidgetId;
use crate::widgets::{WidgetInstance, WidgetSettings};

/// Widget instances for the current session, in insertion order.
pub struct WidgetRegistry {
    instances: ObservableVector<WidgetInstance>,
}

impl Default for WidgetRegistry {
    fn default() -> Self { Self::new() }
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self { Self { instances: ObservableVector::new() } }

    /// Get an instance by id.
    #[must_use]
    pub fn get(&self, id: &WidgetId) -> Option<WidgetInstance> { self.find(id).cloned() }

    /// Borrow an instance by id.
    #[must_use]
    pub fn find(&self, id: &WidgetId) -> Option<&WidgetInstance> {
        self.instances.iter().find(|i| &i.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool { self.index_of(id).is_some() }

    /// All instances in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<WidgetInstance> { self.instances.iter().cloned().collect() }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetInstance> { self.instances.iter() }

    /// Ids of all instances, in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<WidgetId> { self.instances.iter().map(|i| i.id.clone()).collect() }

    #[must_use]
    pub fn len(&self) -> usize { self.instances.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.instances.is_empty() }

    fn index_of(&self, id: &WidgetId) -> Option<usize> {
        self.instances.iter().position(|i| &i.id == id)
    }

    /// Append an instance. Returns `false` and leaves the registry unchanged
    /// if the id is taken.
    pub fn insert(&mut self, instance: WidgetInstance) -> bool {
        if self.contains(&instance.id) {
            return false;
        }
        self.instances.push_back(instance);
        true
    }

    /// Remove an instance by id.
    pub fn remove(&mut self, id: &WidgetId) -> Option<WidgetInstance> {
        let idx = self.index_of(id)?;
        Some(self.instances.remove(idx))
    }

    /// Replace the settings of one instance, keeping its position.
    ///
    /// Returns `false` if no instance has `id`.
    pub fn set_settings(&mut self, id: &WidgetId, settings: WidgetSettings) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.instances.set(idx, WidgetInstance::new(id.clone(), settings));
        true
    }

    /// Replace every instance at once, notifying subscribers in one batch.
    pub fn replace_all(&mut self, instances: impl IntoIterator<Item = WidgetInstance>) {
        let instances: Vector<WidgetInstance> = instances.into_iter().collect();
        let mut txn = self.instances.transaction();
        txn.clear();
        if !instances.is_empty() {
            txn.append(instances);
        }
        txn.commit();
    }

    /// Subscribe to changes of the instance list.
    #[must_use]
    pub fn subscribe(&self) -> VectorSubscriber<WidgetInstance> { self.instances.subscribe() }
}

#[cfg(test)]
mod tests {
    use eyeball_im::VectorDiff;
    use futures::{FutureExt, StreamExt};

    use super::*;
    use crate::widgets::{ClockSettings, ClockStyle, WidgetType};

    fn instance(id: &str, kind: WidgetType) -> WidgetInstance {
        WidgetInstance::new(WidgetId::new(id), WidgetSettings::default_for(kind))
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = WidgetRegistry::new();
        assert!(registry.insert(instance("a", WidgetType::Clock)));
        assert!(!registry.insert(instance("a", WidgetType::Todo)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&"a".into()).unwrap().widget_type(), WidgetType::Clock);
    }

    #[test]
    fn test_remove() {
        let mut registry = WidgetRegistry::new();
        registry.insert(instance("a", WidgetType::Clock));
        registry.insert(instance("b", WidgetType::Quote));

        assert!(registry.remove(&"a".into()).is_some());
        assert!(registry.remove(&"a".into()).is_none());
        assert_eq!(registry.ids(), vec![WidgetId::new("b")]);
    }

    #[test]
    fn test_set_settings_keeps_order() {
        let mut registry = WidgetRegistry::new();
        registry.insert(instance("a", WidgetType::Sticky));
        registry.insert(instance("b", WidgetType::Clock));

        let settings = WidgetSettings::Sticky(crate::widgets::StickySettings {
            color: crate::widgets::StickyColor::Blue,
        });
        assert!(registry.set_settings(&"a".into(), settings.clone()));
        assert!(!registry.set_settings(&"zzz".into(), settings.clone()));

        let all = registry.all();
        assert_eq!(all[0].settings, settings);
        assert_eq!(all[1].id.as_str(), "b");
    }

    #[test]
    fn test_subscriber_follows_instance_changes() {
        let mut registry = WidgetRegistry::new();
        registry.replace_all([instance("a", WidgetType::Clock), instance("b", WidgetType::Quote)]);
        let mut stream = Box::pin(registry.subscribe().into_batched_stream());

        registry.insert(instance("c", WidgetType::Sticky));
        let analog = WidgetSettings::Clock(ClockSettings { style: ClockStyle::Analog });
        registry.set_settings(&WidgetId::new("a"), analog.clone());
        registry.remove(&WidgetId::new("b"));

        let batch = stream.next().now_or_never().flatten().unwrap();
        assert_eq!(
            batch,
            vec![
                VectorDiff::PushBack { value: instance("c", WidgetType::Sticky) },
                VectorDiff::Set { index: 0, value: WidgetInstance::new(WidgetId::new("a"), analog) },
                VectorDiff::Remove { index: 1 },
            ]
        );

        registry.replace_all([instance("z", WidgetType::Todo)]);
        let batch = stream.next().now_or_never().flatten().unwrap();
        assert_eq!(
            batch,
            vec![
                VectorDiff::Clear,
                VectorDiff::Append { values: Vector::from(vec![instance("z", WidgetType::Todo)]) },
            ]
        );
    }
}
