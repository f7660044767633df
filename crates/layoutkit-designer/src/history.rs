//! Undo/redo history for the SKU document
//!
//! History is snapshot based: each undo step stores the whole document as it
//! was before the step. Edits do not push immediately; they schedule a
//! checkpoint that fires after a debounce delay, so a burst of edits (one
//! alignment moving N elements, a drag emitting many moves) lands as one step.

use std::time::{Duration, Instant};

use layoutkit_core::SkuDocument;

/// Default maximum undo depth
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo/redo stacks of document snapshots
#[derive(Debug, Clone)]
pub struct UndoRedoManager {
    undo_stack: Vec<SkuDocument>,
    redo_stack: Vec<SkuDocument>,
    max_depth: usize,
}

impl UndoRedoManager {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records the state before a change. Clears the redo stack.
    pub fn record(&mut self, previous: SkuDocument) {
        self.redo_stack.clear();
        self.undo_stack.push(previous);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Swaps `current` for the previous snapshot.
    pub fn undo(&mut self, current: SkuDocument) -> Option<SkuDocument> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Swaps `current` for the next snapshot.
    pub fn redo(&mut self, current: SkuDocument) -> Option<SkuDocument> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounce timer for history checkpoints, driven by caller-supplied instants.
#[derive(Debug, Clone)]
pub struct CheckpointScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl CheckpointScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)starts the debounce window at `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once when the deadline has passed, clearing it.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Document history: the undo stacks, the debounce timer and the baseline
/// snapshot taken at the last checkpoint.
#[derive(Debug, Clone)]
pub struct DocumentHistory {
    manager: UndoRedoManager,
    scheduler: CheckpointScheduler,
    baseline: SkuDocument,
}

impl DocumentHistory {
    pub fn new(document: &SkuDocument, limit: usize, debounce: Duration) -> Self {
        Self {
            manager: UndoRedoManager::with_depth(limit),
            scheduler: CheckpointScheduler::new(debounce),
            baseline: document.clone(),
        }
    }

    /// Schedules a checkpoint after the debounce delay.
    pub fn schedule(&mut self, now: Instant) {
        self.scheduler.schedule(now);
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Takes the pending checkpoint if its deadline has passed.
    pub fn poll(&mut self, now: Instant, document: &SkuDocument) -> bool {
        if self.scheduler.take_due(now) {
            self.checkpoint(document)
        } else {
            false
        }
    }

    /// Takes a checkpoint immediately. Returns whether a step was recorded.
    pub fn checkpoint(&mut self, document: &SkuDocument) -> bool {
        self.scheduler.cancel();
        if *document == self.baseline {
            return false;
        }
        let previous = std::mem::replace(&mut self.baseline, document.clone());
        self.manager.record(previous);
        tracing::debug!(depth = self.manager.undo_count(), "history checkpoint");
        true
    }

    /// Reverts `document` to the previous checkpoint. Pending edits are
    /// checkpointed first so they are what gets undone.
    pub fn undo(&mut self, document: &mut SkuDocument) -> bool {
        self.checkpoint(document);
        match self.manager.undo(document.clone()) {
            Some(previous) => {
                self.baseline = previous.clone();
                *document = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, document: &mut SkuDocument) -> bool {
        if self.checkpoint(document) {
            // a fresh edit invalidated the redo stack
            return false;
        }
        match self.manager.redo(document.clone()) {
            Some(next) => {
                self.baseline = next.clone();
                *document = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.manager.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.manager.undo_count()
    }

    /// Forgets all history and rebases on `document`.
    pub fn reset(&mut self, document: &SkuDocument) {
        self.manager.clear();
        self.scheduler.cancel();
        self.baseline = document.clone();
    }
}
