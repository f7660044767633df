//! Page-level pointer listener lifecycle.
//!
//! A gesture holds a [`ListenerGuard`] for its whole lifetime. Dropping the
//! guard detaches the pointer-move and pointer-up listeners, so they are
//! released on every exit path: release, cancel, or the session going away.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

pub type ListenerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Move,
    Up,
}

/// Something that can attach page-level pointer listeners, e.g. the window
/// hosting the editor.
pub trait PointerListenerHost {
    fn attach(&self, kind: PointerEventKind, gesture: &'static str) -> ListenerId;
    fn detach(&self, id: ListenerId);
}

/// In-process listener host that records what is attached.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: Cell<ListenerId>,
    active: RefCell<BTreeMap<ListenerId, (PointerEventKind, &'static str)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.active.borrow().contains_key(&id)
    }

    /// Gesture names with live listeners.
    pub fn gestures(&self) -> Vec<&'static str> {
        self.active.borrow().values().map(|(_, g)| *g).collect()
    }
}

impl PointerListenerHost for ListenerRegistry {
    fn attach(&self, kind: PointerEventKind, gesture: &'static str) -> ListenerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.active.borrow_mut().insert(id, (kind, gesture));
        tracing::trace!(id, ?kind, gesture, "pointer listener attached");
        id
    }

    fn detach(&self, id: ListenerId) {
        if self.active.borrow_mut().remove(&id).is_some() {
            tracing::trace!(id, "pointer listener detached");
        }
    }
}

/// Move and up listeners for one gesture, detached on drop.
pub struct ListenerGuard {
    host: Rc<dyn PointerListenerHost>,
    ids: [ListenerId; 2],
}

impl ListenerGuard {
    pub fn acquire(host: Rc<dyn PointerListenerHost>, gesture: &'static str) -> Self {
        let move_id = host.attach(PointerEventKind::Move, gesture);
        let up_id = host.attach(PointerEventKind::Up, gesture);
        Self {
            host,
            ids: [move_id, up_id],
        }
    }

    pub fn ids(&self) -> [ListenerId; 2] {
        self.ids
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for id in self.ids {
            self.host.detach(id);
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("ids", &self.ids).finish()
    }
}
