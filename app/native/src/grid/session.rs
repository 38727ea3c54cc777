//! The session: one board's state and every operation that mutates it.
//!
//! A [`Session`] owns the layout store, the widget registry, per-widget
//! data, the interaction controller and the renderer. Instances and
//! placements are only ever changed together through its methods, so
//! outside a single call every instance has exactly one placement and vice
//! versa.
//!
//! After each completed mutation the session hands a snapshot to its
//! persistence handle, if it has one, and carries on without waiting.

use std::collections::HashSet;

use eyeball::{Observable, Subscriber};
use serde_json::{Map, Value};

use super::error::{SessionError, SessionResult};
use super::interaction::{
    InteractionController, InteractionOutcome, NoopBinder, PointerBinder, PointerDown, PreviewRect,
};
use super::layout_store::LayoutStore;
use super::placement::search_free_position;
use super::registry::WidgetRegistry;
use super::renderer::{GridMetrics, GridRenderer, RenderFrame, ScreenPoint};
use super::types::{GridDimensions, GridRect, GridSize, Placement, WidgetId};
use crate::config::StartpageConfig;
use crate::constants::{DEFAULT_GRID_GAP, SETTINGS_VERSION};
use crate::persistence::{PersistHandle, StoredSettings, UiSettings};
use crate::widgets::{WidgetDataMap, WidgetDataStore, WidgetInstance, WidgetSettings, WidgetType};

// ============================================================================
// Options
// ============================================================================

/// Grid shape and placement behaviour for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub dims: GridDimensions,
    /// Gap between cells, in pixels.
    pub gap: f64,
    /// Initial viewport width, in pixels.
    pub viewport_width: f64,
    /// Reject adds that find no free position instead of overlapping.
    pub strict_placement: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dims: GridDimensions::default(),
            gap: DEFAULT_GRID_GAP,
            viewport_width: 0.0,
            strict_placement: false,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(config: &StartpageConfig) -> Self {
        Self {
            dims: config.grid.dimensions(),
            gap: config.grid.gap(),
            viewport_width: 0.0,
            strict_placement: config.placement.strict_placement,
        }
    }

    #[must_use]
    pub const fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }
}

// ============================================================================
// Session
// ============================================================================

/// One board: widgets, their placements and the gesture in progress.
pub struct Session {
    dims: GridDimensions,
    strict_placement: bool,
    layout: LayoutStore,
    registry: WidgetRegistry,
    widget_data: WidgetDataMap,
    interaction: InteractionController,
    renderer: GridRenderer,
    editing: Observable<bool>,
    persist: Option<PersistHandle>,
}

impl Default for Session {
    fn default() -> Self { Self::new(SessionOptions::default()) }
}

impl Session {
    /// Create an empty board.
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        Self {
            dims: options.dims,
            strict_placement: options.strict_placement,
            layout: LayoutStore::new(),
            registry: WidgetRegistry::new(),
            widget_data: WidgetDataMap::new(),
            interaction: InteractionController::new(Box::new(NoopBinder)),
            renderer: GridRenderer::new(GridMetrics::for_width(
                options.dims,
                options.gap,
                options.viewport_width,
            )),
            editing: Observable::new(false),
            persist: None,
        }
    }

    /// Create a board from a stored document.
    ///
    /// Orphaned or duplicated entries are dropped so the result is
    /// consistent.
    #[must_use]
    pub fn restore(settings: StoredSettings, options: SessionOptions) -> Self {
        let mut session = Self::new(options);
        session.apply_settings(settings);
        session
    }

    /// Sends a snapshot to `handle` after every mutation.
    #[must_use]
    pub fn with_persistence(mut self, handle: PersistHandle) -> Self {
        self.persist = Some(handle);
        self
    }

    /// Uses `binder` to register pointer handlers during gestures.
    #[must_use]
    pub fn with_pointer_binder(mut self, binder: Box<dyn PointerBinder>) -> Self {
        self.interaction = InteractionController::new(binder);
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions { self.dims }

    #[must_use]
    pub const fn layout(&self) -> &LayoutStore { &self.layout }

    #[must_use]
    pub const fn registry(&self) -> &WidgetRegistry { &self.registry }

    #[must_use]
    pub const fn widget_data(&self) -> &WidgetDataMap { &self.widget_data }

    #[must_use]
    pub const fn interaction(&self) -> &InteractionController { &self.interaction }

    #[must_use]
    pub const fn metrics(&self) -> &GridMetrics { self.renderer.metrics() }

    /// Whether drag and resize affordances are active.
    #[must_use]
    pub fn is_editing(&self) -> bool { *Observable::get(&self.editing) }

    /// Subscribe to changes of the editing flag.
    #[must_use]
    pub fn subscribe_editing(&self) -> Subscriber<bool> { Observable::subscribe(&self.editing) }

    /// The placement of a widget.
    #[must_use]
    pub fn placement(&self, id: &WidgetId) -> Option<Placement> { self.layout.get(id) }

    /// A widget instance.
    #[must_use]
    pub fn instance(&self, id: &WidgetId) -> Option<WidgetInstance> { self.registry.get(id) }

    /// The current board as a settings document.
    #[must_use]
    pub fn snapshot(&self) -> StoredSettings {
        StoredSettings {
            version: SETTINGS_VERSION,
            widget_instances: self.registry.all(),
            layout: self.layout.all(),
            widget_data: self.widget_data.clone(),
            ui: UiSettings { edit_mode: self.is_editing() },
        }
    }

    /// Returns `true` if instances and placements pair up one to one.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.registry.len() != self.layout.len() {
            return false;
        }
        let instance_ids: HashSet<WidgetId> = self.registry.ids().into_iter().collect();
        let placement_ids: HashSet<WidgetId> = self.layout.ids().into_iter().collect();
        instance_ids.len() == self.registry.len()
            && placement_ids.len() == self.layout.len()
            && instance_ids == placement_ids
    }

    // ========================================================================
    // Board Mutations
    // ========================================================================

    /// Adds a widget with the given settings and returns its id.
    ///
    /// The widget gets its type's default size at the first free position.
    /// When the board is full the widget is placed at the origin, or
    /// rejected with [`SessionError::GridFull`] under strict placement.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicateId`] if the generated id is taken or
    /// [`SessionError::GridFull`] as described above. The board is left
    /// unchanged on error.
    pub fn add_instance(&mut self, settings: WidgetSettings) -> SessionResult<WidgetId> {
        let kind = settings.widget_type();
        let id = WidgetId::generate(kind.as_str());
        self.insert_instance(WidgetInstance::new(id.clone(), settings))?;
        Ok(id)
    }

    /// Adds a widget of `kind` with default settings.
    ///
    /// # Errors
    ///
    /// See [`Session::add_instance`].
    pub fn add_default_instance(&mut self, kind: WidgetType) -> SessionResult<WidgetId> {
        self.add_instance(WidgetSettings::default_for(kind))
    }

    fn insert_instance(&mut self, instance: WidgetInstance) -> SessionResult<()> {
        let id = instance.id.clone();
        if self.registry.contains(&id) || self.layout.contains(&id) {
            return Err(SessionError::DuplicateId(id));
        }

        let default = instance.widget_type().default_size();
        let size = GridSize::new(default.w.min(self.dims.cols), default.h.min(self.dims.rows));
        let search = search_free_position(self.layout.iter(), size, self.dims);
        if search.is_fallback() && self.strict_placement {
            return Err(SessionError::GridFull { w: size.w, h: size.h });
        }
        let placement = Placement::new(id.clone(), GridRect::from_parts(search.point(), size));

        if !self.registry.insert(instance) {
            return Err(SessionError::DuplicateId(id));
        }
        if let Err(err) = self.layout.add(placement) {
            self.registry.remove(&id);
            return Err(err.into());
        }

        tracing::debug!(id = %id, fallback = search.is_fallback(), "widget added");
        self.mutated();
        Ok(())
    }

    /// Removes a widget, its placement and any data stored for it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownWidget`] if neither an instance nor a
    /// placement has `id`.
    pub fn remove_instance(&mut self, id: &WidgetId) -> SessionResult<()> {
        if self.interaction.preview().is_some_and(|p| &p.id == id) {
            self.interaction.reset();
        }

        let instance = self.registry.remove(id);
        let placement = self.layout.remove(id);
        if instance.is_none() && placement.is_none() {
            return Err(SessionError::UnknownWidget(id.clone()));
        }
        self.widget_data.delete_by_key(id);

        tracing::debug!(id = %id, "widget removed");
        self.mutated();
        Ok(())
    }

    /// Shallow-merges `patch` into a widget's settings.
    ///
    /// The placement is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownWidget`] for an unknown id and
    /// [`SessionError::InvalidSettings`] if the merged settings do not fit
    /// the widget's type; the settings are unchanged in both cases.
    pub fn update_instance_settings(
        &mut self,
        id: &WidgetId,
        patch: &Map<String, Value>,
    ) -> SessionResult<()> {
        let instance = self.registry.find(id).ok_or_else(|| SessionError::UnknownWidget(id.clone()))?;
        let merged = instance
            .settings
            .merged(patch)
            .map_err(|err| SessionError::invalid_settings(id, err.to_string()))?;

        self.registry.set_settings(id, merged);
        tracing::debug!(id = %id, "widget settings updated");
        self.mutated();
        Ok(())
    }

    /// Replaces every placement, e.g. with a layout edited elsewhere.
    ///
    /// The new layout must contain exactly one placement per widget.
    /// Overlap and bounds are not re-checked. Any gesture in progress is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicateId`] for a repeated id and
    /// [`SessionError::UnknownWidget`] for an id present on only one side.
    pub fn replace_layout(&mut self, placements: Vec<Placement>) -> SessionResult<()> {
        let mut seen = HashSet::new();
        for placement in &placements {
            if !seen.insert(placement.id.clone()) {
                return Err(SessionError::DuplicateId(placement.id.clone()));
            }
            if !self.registry.contains(&placement.id) {
                return Err(SessionError::UnknownWidget(placement.id.clone()));
            }
        }
        if let Some(missing) = self.registry.iter().find(|i| !seen.contains(&i.id)) {
            return Err(SessionError::UnknownWidget(missing.id.clone()));
        }

        self.interaction.reset();
        self.layout.replace_all(placements);
        self.mutated();
        Ok(())
    }

    /// Replaces the whole board with a stored document.
    pub fn load(&mut self, settings: StoredSettings) {
        self.apply_settings(settings);
        self.mutated();
    }

    fn apply_settings(&mut self, mut settings: StoredSettings) {
        let dropped = settings.reconcile();
        if dropped > 0 {
            tracing::warn!(dropped, "dropped inconsistent widget entries");
        }

        self.interaction.reset();
        self.registry.replace_all(settings.widget_instances);
        self.layout.replace_all(settings.layout);
        self.widget_data = settings.widget_data;
        Observable::set(&mut self.editing, settings.ui.edit_mode);

        let invalid = self.invalid_placements();
        if !invalid.is_empty() {
            tracing::warn!(count = invalid.len(), "stored layout has overlapping or out-of-bounds widgets");
        }
    }

    /// Ids of placements that are out of bounds or overlap an earlier one.
    #[must_use]
    pub fn invalid_placements(&self) -> Vec<WidgetId> {
        let placements = self.layout.all();
        placements
            .iter()
            .enumerate()
            .filter(|(idx, placement)| {
                !super::geometry::is_valid_placement(
                    &placements[..*idx],
                    None,
                    &placement.rect(),
                    self.dims,
                )
            })
            .map(|(_, placement)| placement.id.clone())
            .collect()
    }

    /// Stores opaque data for a widget.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownWidget`] if no widget has `id`.
    pub fn set_widget_data(&mut self, id: &WidgetId, value: Value) -> SessionResult<()> {
        if !self.registry.contains(id) {
            return Err(SessionError::UnknownWidget(id.clone()));
        }
        self.widget_data.insert(id.clone(), value);
        self.mutated();
        Ok(())
    }

    // ========================================================================
    // Editing & Pointer Events
    // ========================================================================

    /// Turns edit mode on or off.
    ///
    /// Turning it off resolves any gesture in progress as a release.
    pub fn set_editing(&mut self, editing: bool) {
        if self.is_editing() == editing {
            return;
        }
        if !editing && self.interaction.is_active() {
            self.pointer_cancel();
        }
        Observable::set(&mut self.editing, editing);
        self.mutated();
    }

    /// Starts a drag or resize. Returns `false` if the event was ignored.
    pub fn pointer_down(&mut self, event: &PointerDown) -> bool {
        let min_size = self
            .registry
            .find(&event.id)
            .map_or(GridSize::new(1, 1), |instance| instance.widget_type().min_size());
        let editing = self.is_editing();
        self.interaction.pointer_down(event, &self.layout, min_size, editing)
    }

    /// Updates the preview for a pointer move.
    pub fn pointer_move(&mut self, position: ScreenPoint) -> Option<PreviewRect> {
        self.interaction.pointer_move(position, &self.layout, self.renderer.metrics()).cloned()
    }

    /// Ends the gesture, committing a valid preview.
    pub fn pointer_up(&mut self) -> InteractionOutcome {
        let outcome = self.interaction.pointer_up(&mut self.layout, self.dims);
        self.after_gesture(&outcome);
        outcome
    }

    /// Resolves a gesture after pointer capture was lost.
    pub fn pointer_cancel(&mut self) -> InteractionOutcome {
        let outcome = self.interaction.cancel(&mut self.layout, self.dims);
        self.after_gesture(&outcome);
        outcome
    }

    fn after_gesture(&mut self, outcome: &InteractionOutcome) {
        if outcome.is_committed() {
            self.mutated();
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Recomputes the cell size for a new viewport width.
    ///
    /// A gesture in progress keeps going with the new size.
    pub fn resize_viewport(&mut self, width: f64) -> bool { self.renderer.resize(width) }

    /// Moves the grid origin used to map pointer positions to cells.
    pub fn set_viewport_origin(&mut self, origin: ScreenPoint) { self.renderer.set_origin(origin); }

    /// The current frame: committed widgets plus the live preview.
    #[must_use]
    pub fn render(&self) -> RenderFrame {
        self.renderer.render(&self.layout, &self.registry, self.interaction.preview())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn mutated(&self) {
        debug_assert!(
            self.is_consistent(),
            "widget instances and placements are out of sync"
        );
        if let Some(handle) = &self.persist {
            handle.notify(self.snapshot());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
