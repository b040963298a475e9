use std::fmt;

/// Identifies a data source (resource kind) a table displays.
///
/// Opaque to the engine; used to tag snapshots and to key per-source
/// view settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Horizontal alignment for a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Value class of a column, driving sort comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// Plain text, lexical ordering.
    #[default]
    Text,
    /// Numeric values, parsed before comparing; unparseable ones sort last.
    Numeric,
    /// Duration values like "90s", "5m", "2h", "3d"; unparseable ones sort last.
    Duration,
}

/// A single column definition within a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    /// Column name, the lookup key for sorts and view settings.
    pub name: String,
    /// Value class used by the sort engine.
    pub kind: CellKind,
    /// Cell alignment.
    pub align: Align,
    /// Shown only when the table is in wide mode.
    pub wide: bool,
}

impl HeaderColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CellKind::Text,
            align: Align::Left,
            wide: false,
        }
    }

    pub fn numeric(mut self) -> Self {
        self.kind = CellKind::Numeric;
        self.align = Align::Right;
        self
    }

    pub fn duration(mut self) -> Self {
        self.kind = CellKind::Duration;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub fn wide(mut self) -> Self {
        self.wide = true;
        self
    }
}

/// Ordered column schema for one snapshot.
///
/// Column names are unique and positional: index i here pairs with
/// index i in every row's field list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    columns: Vec<HeaderColumn>,
}

impl Header {
    pub fn new(columns: Vec<HeaderColumn>) -> Self {
        Self { columns }
    }

    /// Build a header of plain text columns from names.
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            columns: names.iter().copied().map(HeaderColumn::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderColumn> {
        self.columns.iter()
    }

    pub fn column(&self, index: usize) -> Option<&HeaderColumn> {
        self.columns.get(index)
    }

    /// Position of a column by exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether two headers describe the same grid shape.
    /// A mismatch in column count or any name is a shape change.
    pub fn shape_matches(&self, other: &Header) -> bool {
        self.len() == other.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|(a, b)| a.name == b.name)
    }
}

/// One logical entity in a table: a stable identity plus its current
/// display values. Fields are positional against the snapshot's header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub id: String,
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(id: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}
