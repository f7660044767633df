use std::collections::BTreeSet;

/// Tracks which elements are selected in an editing session, and which are
/// locked against manipulation.
///
/// # Selection Model
///
/// - **Single selection**: `select` replaces the set with one key
/// - **Multi-select**: `toggle` adds or removes a key without touching others
/// - **Sole selection**: gestures only start on the one selected element
///
/// Keys are spec element keys or custom element ids; both live in the same
/// namespace per layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<String>,
    locked: BTreeSet<String>,
}

impl SelectionSet {
    /// Creates an empty selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use layoutkit_designer::selection_manager::SelectionSet;
    ///
    /// let selection = SelectionSet::new();
    /// assert!(selection.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection with `key`.
    pub fn select(&mut self, key: impl Into<String>) {
        self.selected.clear();
        self.selected.insert(key.into());
    }

    /// Adds `key` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.selected.remove(key) {
            false
        } else {
            self.selected.insert(key.to_string());
            true
        }
    }

    /// Replaces the selection with `keys`.
    pub fn select_many<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = keys.into_iter().map(Into::into).collect();
    }

    pub fn deselect(&mut self, key: &str) -> bool {
        self.selected.remove(key)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The selected key, if exactly one element is selected.
    pub fn sole(&self) -> Option<&str> {
        if self.selected.len() == 1 {
            self.selected.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// Selected keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn set_locked(&mut self, key: &str, locked: bool) {
        if locked {
            self.locked.insert(key.to_string());
        } else {
            self.locked.remove(key);
        }
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.locked.contains(key)
    }

    /// Drops every reference to `key`, e.g. after the element was deleted.
    pub fn forget(&mut self, key: &str) {
        self.selected.remove(key);
        self.locked.remove(key);
    }
}
