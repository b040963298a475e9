//! Snapshot diffing for live table refreshes.
//!
//! Classifies every row of an incoming snapshot against the previously
//! displayed one, keyed by row identity. Vanished rows ride along as
//! Deleted for exactly one cycle: the retained baseline is the raw
//! incoming snapshot, which no longer contains them.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::data::Row;
use crate::snapshot::TableData;

/// Change classification of a row between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Added,
    Updated,
    Unchanged,
    Deleted,
}

/// A row plus its change classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEvent {
    pub kind: RowKind,
    pub row: Row,
}

impl RowEvent {
    pub fn new(kind: RowKind, row: Row) -> Self {
        Self { kind, row }
    }

    /// Wraps a raw model row; diffing recomputes the kind.
    pub fn unchanged(row: Row) -> Self {
        Self::new(RowKind::Unchanged, row)
    }
}

/// Ordered collection of row events with O(1) lookup by row id.
///
/// Order is insertion order until a sort reorders it; the id index is
/// rebuilt after every reorder.
#[derive(Debug, Clone, Default)]
pub struct RowEvents {
    events: Vec<RowEvent>,
    index: HashMap<String, usize>,
}

impl RowEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Build from raw rows, all classified Unchanged.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut out = Self::with_capacity(rows.len());
        for row in rows {
            out.push(RowEvent::unchanged(row));
        }
        out
    }

    pub fn push(&mut self, event: RowEvent) {
        self.index.insert(event.row.id.clone(), self.events.len());
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&RowEvent> {
        self.events.get(position)
    }

    /// Event for a row id, if present.
    pub fn by_id(&self, id: &str) -> Option<&RowEvent> {
        self.index.get(id).map(|&i| &self.events[i])
    }

    /// Current position of a row id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowEvent> {
        self.events.iter()
    }

    /// Stable in-place reorder; rebuilds the id index afterwards.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&RowEvent, &RowEvent) -> Ordering,
    {
        self.events.sort_by(|a, b| cmp(a, b));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, event) in self.events.iter().enumerate() {
            self.index.insert(event.row.id.clone(), i);
        }
    }
}

impl<'a> IntoIterator for &'a RowEvents {
    type Item = &'a RowEvent;
    type IntoIter = std::slice::Iter<'a, RowEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Classify every row of `next` against `previous`.
///
/// No baseline or a header shape change classifies everything Added and
/// carries no Deleted rows (callers treat that as a full redraw). Rows
/// present only in the baseline are appended as Deleted, after next's
/// rows. `previous` must be the raw prior snapshot, not a diff result.
pub fn diff(previous: Option<&TableData>, next: &TableData) -> RowEvents {
    let mut out = RowEvents::with_capacity(next.row_count());

    let prev = match previous {
        Some(p) if p.header().shape_matches(next.header()) => p,
        _ => {
            for event in next.events() {
                out.push(RowEvent::new(RowKind::Added, event.row.clone()));
            }
            return out;
        }
    };

    for event in next.events() {
        let kind = match prev.events().by_id(&event.row.id) {
            None => RowKind::Added,
            Some(old) if old.row.fields == event.row.fields => RowKind::Unchanged,
            Some(_) => RowKind::Updated,
        };
        out.push(RowEvent::new(kind, event.row.clone()));
    }

    for old in prev.events() {
        if out.by_id(&old.row.id).is_none() {
            out.push(RowEvent::new(RowKind::Deleted, old.row.clone()));
        }
    }

    out
}
