//! Interactive manipulation: drag, 8-handle resize and rotate.

pub mod handles;
pub mod listeners;
pub mod session;
pub mod snapping;

pub use handles::ResizeHandle;
pub use listeners::{ListenerGuard, ListenerId, ListenerRegistry, PointerEventKind, PointerListenerHost};
pub use session::{
    pointer_angle, AngleFn, EntryContext, GestureCommit, GestureKind, GestureState, GestureUpdate,
    ManipulationConfig, ManipulationSession, Modifiers, RotationInput,
};
pub use snapping::{clamp_to_canvas, constrain_to_axis, snap};
