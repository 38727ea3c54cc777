//! The authoritative ordered collection of widget placements.
//!
//! Backed by an `eyeball_im::ObservableVector` so hosts can subscribe to
//! changes and re-render only what moved. Every operation either applies
//! completely or leaves the store untouched.

use eyeball_im::{ObservableVector, Vector, VectorSubscriber};

use super::error::LayoutError;
use super::types::{GridRect, Placement, WidgetId};

/// Ordered placements for the current session, in insertion order.
pub struct LayoutStore {
    placements: ObservableVector<Placement>,
}

impl Default for LayoutStore {
    fn default() -> Self { Self::new() }
}

impl LayoutStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self { Self { placements: ObservableVector::new() } }

    /// Create a store holding `placements` in the given order.
    #[must_use]
    pub fn with_placements(placements: impl IntoIterator<Item = Placement>) -> Self {
        let mut store = Self::new();
        store.replace_all(placements);
        store
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a placement by id.
    #[must_use]
    pub fn get(&self, id: &WidgetId) -> Option<Placement> { self.find(id).cloned() }

    /// Borrow a placement by id.
    #[must_use]
    pub fn find(&self, id: &WidgetId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.id == id)
    }

    /// Returns `true` if a placement with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool { self.index_of(id).is_some() }

    /// All placements in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Placement> { self.placements.iter().cloned().collect() }

    /// Iterate placements in insertion order without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> { self.placements.iter() }

    /// Ids of all placements, in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<WidgetId> { self.placements.iter().map(|p| p.id.clone()).collect() }

    #[must_use]
    pub fn len(&self) -> usize { self.placements.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.placements.is_empty() }

    fn index_of(&self, id: &WidgetId) -> Option<usize> {
        self.placements.iter().position(|p| &p.id == id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a placement.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateId`] if the id is already present; the
    /// store is left unchanged.
    pub fn add(&mut self, placement: Placement) -> Result<(), LayoutError> {
        if self.contains(&placement.id) {
            return Err(LayoutError::DuplicateId(placement.id));
        }
        self.placements.push_back(placement);
        Ok(())
    }

    /// Remove the placement with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &WidgetId) -> Option<Placement> {
        let idx = self.index_of(id)?;
        Some(self.placements.remove(idx))
    }

    /// Replace every placement at once.
    ///
    /// Subscribers see a single batch: `Clear` followed by one `Append`.
    /// Non-overlap is not re-validated here; callers hand in a layout they
    /// have already checked.
    pub fn replace_all(&mut self, placements: impl IntoIterator<Item = Placement>) {
        let placements: Vector<Placement> = placements.into_iter().collect();
        let mut txn = self.placements.transaction();
        txn.clear();
        if !placements.is_empty() {
            txn.append(placements);
        }
        txn.commit();
    }

    /// Move or resize a single placement in place, keeping its order.
    ///
    /// Returns `false` if no placement has `id`.
    pub fn update_rect(&mut self, id: &WidgetId, rect: GridRect) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let mut placement = self.placements[idx].clone();
        placement.set_rect(rect);
        self.placements.set(idx, placement);
        true
    }

    /// Subscribe to changes of the placement list.
    #[must_use]
    pub fn subscribe(&self) -> VectorSubscriber<Placement> { self.placements.subscribe() }
}

// ============================================================================
// Tests
// ============================================================================
