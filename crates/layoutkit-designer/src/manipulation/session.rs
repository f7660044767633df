//! The drag / resize / rotate state machine.
//!
//! A session is idle until a gesture starts on the sole selected, unlocked
//! element while the editor is in edit mode. Pointer moves produce
//! [`GestureUpdate`]s; the release produces a [`GestureCommit`] and returns
//! the session to idle. Pointer positions are page pixels; everything the
//! session emits is in logical canvas units.

use std::rc::Rc;

use layoutkit_core::{Bounds, CanvasSize, GestureRejected, PartialGeometry};
use layoutkit_settings::EditorSettings;

use super::handles::ResizeHandle;
use super::listeners::{ListenerGuard, PointerListenerHost};
use super::snapping::{clamp_to_canvas, constrain_to_axis, snap};
use crate::selection_manager::SelectionSet;

/// Limits and scale the session works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManipulationConfig {
    pub preview_scale: f64,
    pub grid_step: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub canvas: CanvasSize,
}

impl ManipulationConfig {
    pub fn from_settings(settings: &EditorSettings, canvas: CanvasSize) -> Self {
        Self {
            preview_scale: settings.preview_scale,
            grid_step: settings.grid_step,
            min_width: settings.min_width,
            min_height: settings.min_height,
            canvas,
        }
    }
}

impl Default for ManipulationConfig {
    fn default() -> Self {
        Self::from_settings(&EditorSettings::default(), CanvasSize::SQUARE)
    }
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Restrict a drag to its dominant axis.
    pub axis_lock: bool,
    /// Skip grid snapping.
    pub snap_bypass: bool,
    /// Keep the starting aspect ratio while resizing.
    pub aspect_lock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
    Rotate,
}

impl GestureKind {
    pub fn name(self) -> &'static str {
        match self {
            GestureKind::Drag => "drag",
            GestureKind::Resize => "resize",
            GestureKind::Rotate => "rotate",
        }
    }
}

/// Inputs to a rotation angle computation. Points share one coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationInput {
    pub center: (f64, f64),
    pub start_pointer: (f64, f64),
    pub pointer: (f64, f64),
    pub start_rotation: f64,
}

/// Computes the element rotation in degrees for a rotate gesture.
pub type AngleFn = Box<dyn Fn(&RotationInput) -> f64>;

/// Rotates by the change of the pointer's angle around the element centre.
/// The result is normalized to `[0, 360)`.
pub fn pointer_angle(input: &RotationInput) -> f64 {
    let angle = |p: (f64, f64)| (p.1 - input.center.1).atan2(p.0 - input.center.0);
    let swept = (angle(input.pointer) - angle(input.start_pointer)).to_degrees();
    (input.start_rotation + swept).rem_euclid(360.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub element_key: String,
    pub pointer_origin: (f64, f64),
    pub start: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub element_key: String,
    pub handle: ResizeHandle,
    pub pointer_origin: (f64, f64),
    pub start: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotateState {
    pub element_key: String,
    pub center: (f64, f64),
    pub pointer_origin: (f64, f64),
    pub start_rotation: f64,
}

/// Transient per-gesture bookkeeping.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    Rotating(RotateState),
}

impl GestureState {
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(_) => Some(GestureKind::Drag),
            GestureState::Resizing(_) => Some(GestureKind::Resize),
            GestureState::Rotating(_) => Some(GestureKind::Rotate),
        }
    }

    pub fn element_key(&self) -> Option<&str> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(s) => Some(&s.element_key),
            GestureState::Resizing(s) => Some(&s.element_key),
            GestureState::Rotating(s) => Some(&s.element_key),
        }
    }
}

/// Geometry produced by one pointer move.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureUpdate {
    pub element_key: String,
    pub kind: GestureKind,
    pub geometry: PartialGeometry,
}

/// Final geometry of a completed gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureCommit {
    pub element_key: String,
    pub kind: GestureKind,
    pub geometry: PartialGeometry,
    /// False when the element ended where it started.
    pub changed: bool,
}

/// Whether the editor allows a gesture on an element right now.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    pub edit_mode: bool,
    pub selection: &'a SelectionSet,
}

pub struct ManipulationSession {
    config: ManipulationConfig,
    state: GestureState,
    host: Rc<dyn PointerListenerHost>,
    listeners: Option<ListenerGuard>,
    angle_fn: AngleFn,
    last: Option<PartialGeometry>,
}

impl ManipulationSession {
    pub fn new(config: ManipulationConfig, host: Rc<dyn PointerListenerHost>) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            host,
            listeners: None,
            angle_fn: Box::new(pointer_angle),
            last: None,
        }
    }

    /// Replaces the rotation angle computation.
    pub fn with_angle_fn(mut self, angle_fn: AngleFn) -> Self {
        self.angle_fn = angle_fn;
        self
    }

    pub fn config(&self) -> &ManipulationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ManipulationConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    fn check_entry(&self, ctx: EntryContext<'_>, element_key: &str) -> Result<(), GestureRejected> {
        if !ctx.edit_mode {
            return Err(GestureRejected::NotEditing);
        }
        if let Some(kind) = self.state.kind() {
            return Err(GestureRejected::GestureActive {
                active: kind.name(),
            });
        }
        if ctx.selection.is_locked(element_key) {
            return Err(GestureRejected::Locked {
                element_key: element_key.to_string(),
            });
        }
        if ctx.selection.sole() != Some(element_key) {
            return Err(GestureRejected::NotSoleSelection {
                element_key: element_key.to_string(),
            });
        }
        Ok(())
    }

    fn enter(&mut self, state: GestureState) {
        let kind = state.kind().map(GestureKind::name).unwrap_or("idle");
        tracing::debug!(gesture = kind, element = ?state.element_key(), "gesture started");
        self.listeners = Some(ListenerGuard::acquire(self.host.clone(), kind));
        self.state = state;
        self.last = None;
    }

    fn exit(&mut self) -> GestureState {
        self.listeners = None;
        self.last = None;
        std::mem::take(&mut self.state)
    }

    pub fn begin_drag(
        &mut self,
        ctx: EntryContext<'_>,
        element_key: &str,
        bounds: Bounds,
        pointer: (f64, f64),
    ) -> Result<(), GestureRejected> {
        self.check_entry(ctx, element_key)?;
        self.enter(GestureState::Dragging(DragState {
            element_key: element_key.to_string(),
            pointer_origin: pointer,
            start: bounds,
        }));
        Ok(())
    }

    pub fn begin_resize(
        &mut self,
        ctx: EntryContext<'_>,
        element_key: &str,
        bounds: Bounds,
        handle: ResizeHandle,
        pointer: (f64, f64),
    ) -> Result<(), GestureRejected> {
        self.check_entry(ctx, element_key)?;
        self.enter(GestureState::Resizing(ResizeState {
            element_key: element_key.to_string(),
            handle,
            pointer_origin: pointer,
            start: bounds,
        }));
        Ok(())
    }

    /// Starts a rotation. `center` is the element centre in the same page
    /// coordinates as `pointer`.
    pub fn begin_rotate(
        &mut self,
        ctx: EntryContext<'_>,
        element_key: &str,
        rotation: f64,
        center: (f64, f64),
        pointer: (f64, f64),
    ) -> Result<(), GestureRejected> {
        self.check_entry(ctx, element_key)?;
        self.enter(GestureState::Rotating(RotateState {
            element_key: element_key.to_string(),
            center,
            pointer_origin: pointer,
            start_rotation: rotation,
        }));
        Ok(())
    }

    /// Handles a pointer move. Returns `None` when idle.
    pub fn pointer_move(&mut self, pointer: (f64, f64), modifiers: Modifiers) -> Option<GestureUpdate> {
        let update = self.compute(pointer, modifiers)?;
        self.last = Some(update.geometry);
        Some(update)
    }

    /// Ends the gesture at `pointer` and returns to idle.
    pub fn pointer_up(&mut self, pointer: (f64, f64), modifiers: Modifiers) -> Option<GestureCommit> {
        let update = self.compute(pointer, modifiers);
        let start = self.start_geometry();
        self.exit();
        let update = update?;
        let changed = start.is_some_and(|s| s != update.geometry);
        tracing::debug!(
            gesture = update.kind.name(),
            element = %update.element_key,
            changed,
            "gesture committed"
        );
        Some(GestureCommit {
            element_key: update.element_key,
            kind: update.kind,
            geometry: update.geometry,
            changed,
        })
    }

    /// Abandons the gesture. Returns the starting geometry so the caller can
    /// restore it.
    pub fn cancel(&mut self) -> Option<GestureUpdate> {
        let start = self.start_geometry();
        let kind = self.state.kind();
        let state = self.exit();
        let element_key = state.element_key()?.to_string();
        tracing::debug!(element = %element_key, "gesture cancelled");
        Some(GestureUpdate {
            element_key,
            kind: kind?,
            geometry: start?,
        })
    }

    /// The most recent update emitted by the active gesture.
    pub fn last_update(&self) -> Option<&PartialGeometry> {
        self.last.as_ref()
    }

    fn start_geometry(&self) -> Option<PartialGeometry> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(s) => Some(PartialGeometry::position(s.start.x, s.start.y)),
            GestureState::Resizing(s) => {
                let mut g = PartialGeometry {
                    width: Some(s.start.width),
                    height: Some(s.start.height),
                    ..Default::default()
                };
                if s.handle.moves_west() {
                    g.x = Some(s.start.x);
                }
                if s.handle.moves_north() {
                    g.y = Some(s.start.y);
                }
                Some(g)
            }
            GestureState::Rotating(s) => Some(PartialGeometry::rotation(s.start_rotation)),
        }
    }

    fn logical_delta(&self, origin: (f64, f64), pointer: (f64, f64)) -> (f64, f64) {
        let scale = self.config.preview_scale;
        ((pointer.0 - origin.0) / scale, (pointer.1 - origin.1) / scale)
    }

    fn compute(&self, pointer: (f64, f64), modifiers: Modifiers) -> Option<GestureUpdate> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(s) => Some(GestureUpdate {
                element_key: s.element_key.clone(),
                kind: GestureKind::Drag,
                geometry: self.drag_geometry(s, pointer, modifiers),
            }),
            GestureState::Resizing(s) => Some(GestureUpdate {
                element_key: s.element_key.clone(),
                kind: GestureKind::Resize,
                geometry: self.resize_geometry(s, pointer, modifiers),
            }),
            GestureState::Rotating(s) => {
                let rotation = (self.angle_fn)(&RotationInput {
                    center: s.center,
                    start_pointer: s.pointer_origin,
                    pointer,
                    start_rotation: s.start_rotation,
                });
                Some(GestureUpdate {
                    element_key: s.element_key.clone(),
                    kind: GestureKind::Rotate,
                    geometry: PartialGeometry::rotation(rotation),
                })
            }
        }
    }

    fn drag_geometry(&self, s: &DragState, pointer: (f64, f64), modifiers: Modifiers) -> PartialGeometry {
        let (mut dx, mut dy) = self.logical_delta(s.pointer_origin, pointer);
        if modifiers.axis_lock {
            (dx, dy) = constrain_to_axis(dx, dy);
        }
        let (mut x, mut y) = (s.start.x + dx, s.start.y + dy);
        if !modifiers.snap_bypass {
            x = snap(x, self.config.grid_step);
            y = snap(y, self.config.grid_step);
        }
        let (x, y) = clamp_to_canvas(x, y, s.start.width, s.start.height, self.config.canvas);
        PartialGeometry::position(x, y)
    }

    fn resize_geometry(
        &self,
        s: &ResizeState,
        pointer: (f64, f64),
        modifiers: Modifiers,
    ) -> PartialGeometry {
        let (dx, dy) = self.logical_delta(s.pointer_origin, pointer);
        let handle = s.handle;
        let start = &s.start;

        let mut width = if handle.moves_east() {
            start.width + dx
        } else if handle.moves_west() {
            start.width - dx
        } else {
            start.width
        };
        let mut height = if handle.moves_south() {
            start.height + dy
        } else if handle.moves_north() {
            start.height - dy
        } else {
            start.height
        };

        if modifiers.aspect_lock && start.width > 0.0 && start.height > 0.0 {
            let ratio = start.width / start.height;
            if handle.is_horizontal() {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
        }

        if !modifiers.snap_bypass {
            width = snap(width, self.config.grid_step);
            height = snap(height, self.config.grid_step);
        }
        width = width.max(self.config.min_width);
        height = height.max(self.config.min_height);

        let mut geometry = PartialGeometry {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        };
        if handle.moves_west() {
            geometry.x = Some(start.x + start.width - width);
        }
        if handle.moves_north() {
            geometry.y = Some(start.y + start.height - height);
        }
        geometry
    }
}

impl std::fmt::Debug for ManipulationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManipulationSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("listeners", &self.listeners)
            .finish()
    }
}
