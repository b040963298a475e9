//! Data source capability set.
//!
//! A model owns the refresh/watch machinery for one data source and
//! pushes snapshots to registered listeners over mpsc channels. The
//! table consumes a model as a boxed trait object and only ever calls
//! a small slice of the surface; the rest is for the embedding app.

use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use crate::config::ViewSettings;
use crate::snapshot::TableData;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no row found for id {0:?}")]
    RowNotFound(String),
    #[error("watch failed: {0}")]
    Watch(String),
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Handle returned by `add_listener`, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Deletion propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Background,
    Foreground,
    Orphan,
}

/// Grace period applied to a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grace {
    /// Source-defined default.
    #[default]
    Default,
    /// Immediate, no grace.
    Now,
    /// Explicit period in seconds.
    Period(u64),
}

/// What a table data source can do.
///
/// Object-safe so callers can hold `Box<dyn Tabular>` and swap sources
/// at runtime. Snapshot delivery is push-based: `refresh` and the
/// `watch` loop send fresh snapshots to every registered listener.
pub trait Tabular {
    /// Latest snapshot, without triggering a refresh.
    fn peek(&self) -> TableData;

    /// Rebuild the snapshot now and push it to listeners.
    fn refresh(&mut self) -> Result<(), ModelError>;

    /// Start background refreshing at the configured rate.
    fn watch(&mut self) -> Result<(), ModelError>;

    fn add_listener(&mut self, listener: Sender<TableData>) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);

    /// Structured detail payload for one row.
    fn get(&self, id: &str) -> Result<serde_json::Value, ModelError>;

    fn delete(&mut self, id: &str, propagation: Propagation, grace: Grace)
        -> Result<(), ModelError>;

    /// Human-readable description of one row.
    fn describe(&self, id: &str) -> Result<String, ModelError>;

    /// YAML rendering of one row's detail payload.
    fn to_yaml(&self, id: &str) -> Result<String, ModelError>;

    fn set_namespace(&mut self, namespace: &str);
    fn namespace(&self) -> &str;

    fn set_label_selector(&mut self, selector: &str);
    fn label_selector(&self) -> &str;

    /// Whether this source ignores namespace scoping.
    fn cluster_wide(&self) -> bool;

    /// Whether rows carry live metric columns.
    fn has_metrics(&self) -> bool;

    fn empty(&self) -> bool;
    fn row_count(&self) -> usize;

    fn set_refresh_rate(&mut self, rate: Duration);
    fn set_view_settings(&mut self, settings: &ViewSettings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_message() {
        let err = ModelError::RowNotFound("ns/r1".to_string());
        assert_eq!(err.to_string(), "no row found for id \"ns/r1\"");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Propagation::default(), Propagation::Background);
        assert_eq!(Grace::default(), Grace::Default);
    }
}
