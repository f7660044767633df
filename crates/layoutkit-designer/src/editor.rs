//! Layout editor: one layout of one SKU open for editing.
//!
//! Wires the selection, the bounds provider, alignment, the manipulation
//! session and history around the SKU document. Pointer moves write live
//! preview geometry into the document; the gesture snapshot restores it on
//! cancel. Commit points are gesture release, completed alignment and element
//! add/remove/revert.

use std::rc::Rc;
use std::time::Instant;

use layoutkit_core::{
    Bounds, BrandRecord, CustomElement, GestureRejected, LayoutSpec, PartialGeometry,
    RenderError, SkuDocument, SkuRecord,
};
use layoutkit_settings::EditorSettings;

use crate::alignment::{self, Alignment, Distribution, Reposition};
use crate::bounds::{BoundsProvider, MeasuredSurface, RenderedSurface};
use crate::history::DocumentHistory;
use crate::manipulation::{
    EntryContext, GestureCommit, GestureUpdate, ManipulationConfig, ManipulationSession,
    Modifiers, PointerListenerHost, ResizeHandle,
};
use crate::renderer::{RenderedFrame, Renderer};
use crate::resolver;
use crate::scene::{build_scene, Scene};
use crate::selection_manager::SelectionSet;
use crate::viewport::Viewport;

pub struct LayoutEditor {
    spec: LayoutSpec,
    brand: BrandRecord,
    sku: SkuRecord,
    settings: EditorSettings,
    viewport: Viewport,
    edit_mode: bool,
    selection: SelectionSet,
    session: ManipulationSession,
    history: DocumentHistory,
    surface: Option<MeasuredSurface>,
    gesture_snapshot: Option<SkuDocument>,
}

impl LayoutEditor {
    pub fn new(
        spec: LayoutSpec,
        brand: BrandRecord,
        sku: SkuRecord,
        settings: &EditorSettings,
        host: Rc<dyn PointerListenerHost>,
    ) -> Self {
        let viewport = Viewport::new(settings.preview_scale, spec.canvas);
        let config = ManipulationConfig::from_settings(settings, spec.canvas);
        let history = DocumentHistory::new(
            &sku.document,
            settings.history_limit,
            settings.history_debounce(),
        );
        Self {
            spec,
            brand,
            sku,
            settings: settings.clone(),
            viewport,
            edit_mode: false,
            selection: SelectionSet::new(),
            session: ManipulationSession::new(config, host),
            history,
            surface: None,
            gesture_snapshot: None,
        }
    }

    pub fn layout_key(&self) -> &str {
        &self.spec.key
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    pub fn sku(&self) -> &SkuRecord {
        &self.sku
    }

    pub fn document(&self) -> &SkuDocument {
        &self.sku.document
    }

    /// Hands back the SKU record, e.g. for saving.
    pub fn into_sku(self) -> SkuRecord {
        self.sku
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn session(&self) -> &ManipulationSession {
        &self.session
    }

    // Edit mode and selection

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Leaving edit mode abandons any active gesture.
    pub fn set_edit_mode(&mut self, on: bool) {
        if !on {
            self.cancel_gesture();
        }
        self.edit_mode = on;
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    pub fn set_locked(&mut self, key: &str, locked: bool) {
        self.selection.set_locked(key, locked);
    }

    fn element_exists(&self, key: &str) -> bool {
        self.spec.elements.contains_key(key) || self.sku.document.is_custom(&self.spec.key, key)
    }

    // Bounds

    fn provider(&self) -> BoundsProvider<'_> {
        let provider = BoundsProvider::new(
            &self.spec.key,
            &self.sku.document,
            self.viewport,
            self.settings.default_bounds_size(),
        )
        .with_spec(&self.spec);
        match &self.surface {
            Some(surface) => provider.with_surface(surface),
            None => provider,
        }
    }

    pub fn bounds_of(&self, key: &str) -> Option<Bounds> {
        self.provider().bounds_of(key)
    }

    // Document writes

    fn write_geometry(&mut self, key: &str, patch: &PartialGeometry) {
        let layout = self.spec.key.clone();
        if let Some(custom) = self.sku.document.custom_element_mut(&layout, key) {
            custom.apply(patch);
        } else {
            self.sku.document.apply_override(&layout, key, *patch);
        }
    }

    fn apply_repositions(&mut self, moves: &[Reposition], now: Instant) -> usize {
        for m in moves {
            self.write_geometry(&m.key, &PartialGeometry::position(m.x, m.y));
        }
        if !moves.is_empty() {
            self.history.schedule(now);
        }
        moves.len()
    }

    /// Aligns the selection. Returns how many elements moved.
    pub fn align(&mut self, alignment: Alignment, now: Instant) -> usize {
        let keys = self.selection.to_vec();
        let moves = {
            let provider = self.provider();
            alignment::align(&keys, alignment, |k| provider.bounds_of(k))
        };
        tracing::info!(op = alignment.name(), moved = moves.len(), "aligned selection");
        self.apply_repositions(&moves, now)
    }

    /// Distributes the selection evenly. Returns how many elements moved.
    pub fn distribute(&mut self, distribution: Distribution, now: Instant) -> usize {
        let keys = self.selection.to_vec();
        let moves = {
            let provider = self.provider();
            alignment::distribute(&keys, distribution, |k| provider.bounds_of(k))
        };
        tracing::info!(?distribution, moved = moves.len(), "distributed selection");
        self.apply_repositions(&moves, now)
    }

    /// Drops the element's override so the layout defaults apply again.
    pub fn revert_element(&mut self, key: &str, now: Instant) -> bool {
        let layout = self.spec.key.clone();
        let removed = self.sku.document.clear_override(&layout, key).is_some();
        if removed {
            self.history.schedule(now);
        }
        removed
    }

    /// Adds a custom element to this layout and returns its id.
    /// Adds a custom element and returns the id it was stored under.
    ///
    /// Custom ids never shadow a layout element or another custom element; a
    /// colliding id is replaced with a fresh one.
    pub fn add_custom_element(&mut self, mut element: CustomElement, now: Instant) -> String {
        let layout = self.spec.key.clone();
        if self.spec.elements.contains_key(&element.id)
            || self.sku.document.is_custom(&layout, &element.id)
        {
            let fresh = CustomElement::fresh_id();
            tracing::warn!(requested = %element.id, assigned = %fresh, "custom element id already in use");
            element.id = fresh;
        }
        let id = element.id.clone();
        self.sku.document.push_custom_element(&layout, element);
        self.history.schedule(now);
        id
    }

    pub fn remove_custom_element(&mut self, id: &str, now: Instant) -> Option<CustomElement> {
        let layout = self.spec.key.clone();
        let removed = self.sku.document.remove_custom_element(&layout, id)?;
        // a stale override under the id must not outlive the element
        self.sku.document.clear_override(&layout, id);
        self.selection.forget(id);
        self.history.schedule(now);
        Some(removed)
    }

    pub fn set_custom_content(&mut self, id: &str, text: impl Into<String>, now: Instant) -> bool {
        if !self.sku.document.is_custom(&self.spec.key, id) {
            return false;
        }
        self.sku.document.set_content(id, text);
        self.history.schedule(now);
        true
    }

    // Gestures

    fn entry_bounds(&self, key: &str) -> Result<Bounds, GestureRejected> {
        if !self.edit_mode {
            return Err(GestureRejected::NotEditing);
        }
        if !self.element_exists(key) {
            return Err(GestureRejected::NoBounds {
                element_key: key.to_string(),
            });
        }
        self.bounds_of(key).ok_or_else(|| GestureRejected::NoBounds {
            element_key: key.to_string(),
        })
    }

    fn current_rotation(&self, key: &str) -> f64 {
        if let Some(custom) = self.sku.document.custom_element(&self.spec.key, key) {
            return custom.rotation.unwrap_or(0.0);
        }
        resolver::resolve_element(&self.spec, &self.sku.document, key)
            .map(|g| g.rotation)
            .unwrap_or(0.0)
    }

    fn gesture_started(&mut self) {
        self.gesture_snapshot = Some(self.sku.document.clone());
    }

    pub fn begin_drag(&mut self, key: &str, pointer: (f64, f64)) -> Result<(), GestureRejected> {
        let ctx = EntryContext {
            edit_mode: self.edit_mode,
            selection: &self.selection,
        };
        let bounds = self.entry_bounds(key)?;
        self.session.begin_drag(ctx, key, bounds, pointer)?;
        self.gesture_started();
        Ok(())
    }

    pub fn begin_resize(
        &mut self,
        key: &str,
        handle: ResizeHandle,
        pointer: (f64, f64),
    ) -> Result<(), GestureRejected> {
        let ctx = EntryContext {
            edit_mode: self.edit_mode,
            selection: &self.selection,
        };
        let bounds = self.entry_bounds(key)?;
        self.session.begin_resize(ctx, key, bounds, handle, pointer)?;
        self.gesture_started();
        Ok(())
    }

    /// Starts rotating around the element centre as painted in the preview.
    pub fn begin_rotate(&mut self, key: &str, pointer: (f64, f64)) -> Result<(), GestureRejected> {
        let ctx = EntryContext {
            edit_mode: self.edit_mode,
            selection: &self.selection,
        };
        let bounds = self.entry_bounds(key)?;
        let origin = self
            .surface
            .as_ref()
            .and_then(|s| s.wrapper_origin())
            .unwrap_or((0.0, 0.0));
        let (cx, cy) = self.viewport.logical_to_screen(bounds.center_x, bounds.center_y);
        let rotation = self.current_rotation(key);
        self.session
            .begin_rotate(ctx, key, rotation, (origin.0 + cx, origin.1 + cy), pointer)?;
        self.gesture_started();
        Ok(())
    }

    /// Applies a pointer move to the document.
    pub fn pointer_move(&mut self, pointer: (f64, f64), modifiers: Modifiers) -> Option<GestureUpdate> {
        let update = self.session.pointer_move(pointer, modifiers)?;
        self.write_geometry(&update.element_key, &update.geometry);
        Some(update)
    }

    /// Ends the gesture and schedules a history checkpoint if anything moved.
    pub fn pointer_up(
        &mut self,
        pointer: (f64, f64),
        modifiers: Modifiers,
        now: Instant,
    ) -> Option<GestureCommit> {
        let commit = self.session.pointer_up(pointer, modifiers)?;
        let snapshot = self.gesture_snapshot.take();
        if commit.changed {
            self.write_geometry(&commit.element_key, &commit.geometry);
            self.history.schedule(now);
        } else if let Some(snapshot) = snapshot {
            self.sku.document = snapshot;
        }
        Some(commit)
    }

    /// Abandons the active gesture and restores the document.
    pub fn cancel_gesture(&mut self) -> bool {
        if self.session.cancel().is_none() {
            return false;
        }
        if let Some(snapshot) = self.gesture_snapshot.take() {
            self.sku.document = snapshot;
        }
        true
    }

    // History

    /// Takes a due checkpoint. Call from the event loop tick.
    pub fn poll_history(&mut self, now: Instant) -> bool {
        self.history.poll(now, &self.sku.document)
    }

    pub fn undo(&mut self) -> bool {
        if !self.session.is_idle() {
            return false;
        }
        self.history.undo(&mut self.sku.document)
    }

    pub fn redo(&mut self) -> bool {
        if !self.session.is_idle() {
            return false;
        }
        self.history.redo(&mut self.sku.document)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.history.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Painting

    pub fn scene(&self) -> Scene {
        build_scene(&self.spec, &self.brand, &self.sku)
    }

    /// Paints the preview and keeps its node rectangles as the live bounds
    /// source.
    pub fn paint_preview(
        &mut self,
        renderer: &Renderer,
        wrapper_origin: (f64, f64),
    ) -> Result<RenderedFrame, RenderError> {
        let frame = renderer.render_preview(&self.scene(), self.viewport.scale(), wrapper_origin)?;
        self.surface = Some(frame.surface.clone());
        Ok(frame)
    }

    /// Forgets the painted surface, e.g. when the preview unmounts.
    pub fn unmount_preview(&mut self) {
        self.surface = None;
    }
}

impl std::fmt::Debug for LayoutEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEditor")
            .field("layout", &self.spec.key)
            .field("sku", &self.sku.id)
            .field("edit_mode", &self.edit_mode)
            .field("selection", &self.selection)
            .field("session", &self.session)
            .finish()
    }
}
