use std::collections::HashMap;

use crate::keys::KeyCombo;

/// Command an action runs against the table that owns the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    /// Sort by the named column; repeating toggles direction.
    SortColumn(String),
}

/// A key-bound operation with a user-facing description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub description: String,
    pub command: TableCommand,
}

impl Action {
    pub fn new(description: impl Into<String>, command: TableCommand) -> Self {
        Self {
            description: description.into(),
            command,
        }
    }

    /// Standard sort action for a column.
    pub fn sort_column(column: &str) -> Self {
        Self::new(
            format!("Sort {column}"),
            TableCommand::SortColumn(column.to_string()),
        )
    }
}

/// Maps key combos to actions. At most one action per combo; binding
/// an already-bound combo replaces the previous action.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<KeyCombo, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, combo: KeyCombo, action: Action) {
        self.actions.insert(combo, action);
    }

    pub fn get(&self, combo: &KeyCombo) -> Option<&Action> {
        self.actions.get(combo)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyCombo, &Action)> {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn test_bind_and_get() {
        let mut registry = ActionRegistry::new();
        let combo = KeyCombo::plain(KeyCode::Char('n'));
        registry.bind(combo, Action::sort_column("NAME"));

        let action = registry.get(&combo).unwrap();
        assert_eq!(action.description, "Sort NAME");
        assert_eq!(action.command, TableCommand::SortColumn("NAME".into()));
    }

    #[test]
    fn test_rebinding_replaces() {
        let mut registry = ActionRegistry::new();
        let combo = KeyCombo::plain(KeyCode::Char('n'));
        registry.bind(combo, Action::sort_column("NAME"));
        registry.bind(combo, Action::sort_column("NAMESPACE"));

        assert_eq!(registry.len(), 1, "one action per combo");
        assert_eq!(
            registry.get(&combo).unwrap().command,
            TableCommand::SortColumn("NAMESPACE".into())
        );
    }

    #[test]
    fn test_unbound_combo_is_none() {
        let registry = ActionRegistry::new();
        assert!(registry.get(&KeyCombo::plain(KeyCode::Enter)).is_none());
        assert!(registry.is_empty());
    }
}
