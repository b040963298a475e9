//! Identity-keyed selection state.
//!
//! Selection is a row id, never a screen position. The rendered index
//! is re-derived from the current view on every refresh, so rows keep
//! their selection while they move and lose it only when they vanish.

use std::collections::HashSet;

/// Current selection plus the marked-row set.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<String>,
    marked: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Toggle a mark; returns whether the id is marked afterwards.
    pub fn toggle_mark(&mut self, id: &str) -> bool {
        if self.marked.remove(id) {
            false
        } else {
            self.marked.insert(id.to_string());
            true
        }
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.marked.contains(id)
    }

    pub fn has_marks(&self) -> bool {
        !self.marked.is_empty()
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    /// Drop state for ids no longer present in the rendered view.
    /// Returns true when the selected row itself was dropped.
    pub fn prune(&mut self, is_present: impl Fn(&str) -> bool) -> bool {
        self.marked.retain(|id| is_present(id));
        match self.selected.as_deref() {
            Some(id) if !is_present(id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_clear() {
        let mut sel = SelectionState::new();
        assert_eq!(sel.selected(), None);

        sel.select("ns/r1");
        assert_eq!(sel.selected(), Some("ns/r1"));
        assert!(sel.is_selected("ns/r1"));

        sel.clear();
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn test_toggle_mark() {
        let mut sel = SelectionState::new();
        assert!(sel.toggle_mark("r1"));
        assert!(sel.is_marked("r1"));
        assert!(!sel.toggle_mark("r1"), "second toggle unmarks");
        assert!(!sel.is_marked("r1"));
    }

    #[test]
    fn test_prune_drops_vanished_ids() {
        let mut sel = SelectionState::new();
        sel.select("r1");
        sel.toggle_mark("r1");
        sel.toggle_mark("r2");

        let dropped = sel.prune(|id| id == "r2");
        assert!(dropped, "selected id vanished");
        assert_eq!(sel.selected(), None);
        assert!(!sel.is_marked("r1"));
        assert!(sel.is_marked("r2"));
    }

    #[test]
    fn test_prune_keeps_surviving_selection() {
        let mut sel = SelectionState::new();
        sel.select("r1");

        let dropped = sel.prune(|_| true);
        assert!(!dropped);
        assert_eq!(sel.selected(), Some("r1"));
    }
}
