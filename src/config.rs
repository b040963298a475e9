//! View configuration and grid styling.
//!
//! Tables receive their configuration through an explicit `ViewContext`
//! at init time; nothing here is ambient global state. Custom views map
//! a source id to its column subset and sort-key bindings and load from
//! a JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::SourceId;
use crate::diff::RowKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read views file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse views file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Column and sort-key configuration for one source's view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Visible columns in display order. Empty shows the header as-is.
    pub columns: Vec<String>,
    /// "COLUMN:KEYNAME" sort bindings.
    pub sort_keys: Vec<String>,
}

impl ViewSettings {
    pub fn new(columns: Vec<String>, sort_keys: Vec<String>) -> Self {
        Self { columns, sort_keys }
    }
}

/// Per-source view settings, keyed by source id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomViews {
    #[serde(default)]
    pub views: HashMap<String, ViewSettings>,
}

impl CustomViews {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn settings(&self, source: &SourceId) -> Option<&ViewSettings> {
        self.views.get(source.as_str())
    }
}

/// Color palette for the rendered grid.
#[derive(Debug, Clone)]
pub struct Styles {
    pub header: Style,
    pub row: Style,
    pub added: Style,
    pub updated: Style,
    pub deleted: Style,
    pub selection: Style,
    pub marked: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            row: Style::default(),
            added: Style::default().fg(Color::Green),
            updated: Style::default().fg(Color::Yellow),
            deleted: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            selection: Style::default().bg(Color::DarkGray),
            marked: Style::default().fg(Color::Magenta),
        }
    }
}

impl Styles {
    /// Cell style for a row's change classification.
    pub fn for_kind(&self, kind: RowKind) -> Style {
        match kind {
            RowKind::Added => self.added,
            RowKind::Updated => self.updated,
            RowKind::Deleted => self.deleted,
            RowKind::Unchanged => self.row,
        }
    }
}

/// Everything a table needs at init time.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub styles: Styles,
    pub views: CustomViews,
}

impl ViewContext {
    pub fn new(styles: Styles, views: CustomViews) -> Self {
        Self { styles, views }
    }

    /// Settings for a source, falling back to the empty default.
    pub fn settings_for(&self, source: &SourceId) -> ViewSettings {
        self.views.settings(source).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_parse_from_json() {
        let raw = r#"{
            "views": {
                "proc/v1": {
                    "columns": ["PID", "NAME", "CPU"],
                    "sort_keys": ["NAME:Shift-N"]
                }
            }
        }"#;

        let views: CustomViews = serde_json::from_str(raw).unwrap();
        let settings = views.settings(&SourceId::new("proc/v1")).unwrap();
        assert_eq!(settings.columns, vec!["PID", "NAME", "CPU"]);
        assert_eq!(settings.sort_keys, vec!["NAME:Shift-N"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = r#"{ "views": { "proc/v1": {} } }"#;
        let views: CustomViews = serde_json::from_str(raw).unwrap();
        let settings = views.settings(&SourceId::new("proc/v1")).unwrap();
        assert!(settings.columns.is_empty());
        assert!(settings.sort_keys.is_empty());
    }

    #[test]
    fn test_settings_for_unknown_source_is_default() {
        let ctx = ViewContext::default();
        let settings = ctx.settings_for(&SourceId::new("nope/v1"));
        assert_eq!(settings, ViewSettings::default());
    }

    #[test]
    fn test_style_per_kind() {
        let styles = Styles::default();
        assert_eq!(styles.for_kind(RowKind::Added), styles.added);
        assert_eq!(styles.for_kind(RowKind::Unchanged), styles.row);
    }
}
