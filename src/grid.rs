use ratatui::style::Style;

use crate::data::Align;
use crate::diff::RowKind;

/// One rendered cell: text plus its resolved style and alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub text: String,
    pub style: Style,
    pub align: Align,
}

impl GridCell {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            align: Align::Left,
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// One rendered data row, tagged with the row id it displays.
#[derive(Debug, Clone)]
pub struct GridRow {
    pub id: String,
    pub kind: RowKind,
    pub cells: Vec<GridCell>,
}

/// The retained grid a table writes into and the draw pass reads.
///
/// Screen indices are 1-based: index 0 is the header row, data rows
/// start at 1. That matches what is visually on screen.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    header: Vec<GridCell>,
    rows: Vec<GridRow>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
    }

    pub fn set_header(&mut self, cells: Vec<GridCell>) {
        self.header = cells;
    }

    pub fn push_row(&mut self, row: GridRow) {
        self.rows.push(row);
    }

    /// Rendered rows including the header row.
    pub fn row_count(&self) -> usize {
        if self.header.is_empty() && self.rows.is_empty() {
            0
        } else {
            self.rows.len() + 1
        }
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn header(&self) -> &[GridCell] {
        &self.header
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Data row at a 1-based screen index; 0 addresses the header and
    /// yields None.
    pub fn data_row_at(&self, screen_index: usize) -> Option<&GridRow> {
        if screen_index == 0 {
            return None;
        }
        self.rows.get(screen_index - 1)
    }

    /// 1-based screen index of a row id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id).map(|i| i + 1)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> GridCell {
        GridCell::new(text, Style::default())
    }

    fn grid_2x3() -> CellGrid {
        let mut grid = CellGrid::new();
        grid.set_header(vec![cell("A"), cell("B"), cell("C")]);
        grid.push_row(GridRow {
            id: "r1".into(),
            kind: RowKind::Unchanged,
            cells: vec![cell("1"), cell("2"), cell("3")],
        });
        grid.push_row(GridRow {
            id: "r2".into(),
            kind: RowKind::Unchanged,
            cells: vec![cell("4"), cell("5"), cell("6")],
        });
        grid
    }

    #[test]
    fn test_counts_include_header_row() {
        let grid = grid_2x3();
        assert_eq!(grid.row_count(), 3, "2 data rows + header");
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.data_row_count(), 2);
    }

    #[test]
    fn test_empty_grid_has_no_rows() {
        let grid = CellGrid::new();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.column_count(), 0);
    }

    #[test]
    fn test_header_only_counts_one_row() {
        let mut grid = CellGrid::new();
        grid.set_header(vec![cell("A")]);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.data_row_count(), 0);
    }

    #[test]
    fn test_screen_indices_are_one_based() {
        let grid = grid_2x3();
        assert!(grid.data_row_at(0).is_none(), "0 is the header row");
        assert_eq!(grid.data_row_at(1).unwrap().id, "r1");
        assert_eq!(grid.data_row_at(2).unwrap().id, "r2");
        assert!(grid.data_row_at(3).is_none());
    }

    #[test]
    fn test_position_of_id() {
        let grid = grid_2x3();
        assert_eq!(grid.position_of("r2"), Some(2));
        assert_eq!(grid.position_of("nope"), None);
        assert!(grid.contains_id("r1"));
    }
}
