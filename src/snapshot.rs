//! Per-refresh table snapshots.
//!
//! A snapshot bundles the header and row set a model observed at one
//! instant, tagged with its source, namespace scope, and a monotonic
//! generation. Models build a fresh snapshot on every refresh; nothing
//! mutates one after construction.

use crate::data::{Header, Row, SourceId};
use crate::diff::RowEvents;

/// One observed state of a tabular data source.
#[derive(Debug, Clone)]
pub struct TableData {
    source: SourceId,
    namespace: String,
    header: Header,
    events: RowEvents,
    generation: u64,
}

impl TableData {
    pub fn new(
        source: SourceId,
        namespace: impl Into<String>,
        header: Header,
        events: RowEvents,
    ) -> Self {
        Self {
            source,
            namespace: namespace.into(),
            header,
            events,
            generation: 0,
        }
    }

    /// Convenience for models holding plain rows.
    pub fn from_rows(
        source: SourceId,
        namespace: impl Into<String>,
        header: Header,
        rows: Vec<Row>,
    ) -> Self {
        Self::new(source, namespace, header, RowEvents::from_rows(rows))
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn events(&self) -> &RowEvents {
        &self.events
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of data rows. O(1).
    pub fn row_count(&self) -> usize {
        self.events.len()
    }

    /// Number of header columns. O(1).
    pub fn header_count(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
