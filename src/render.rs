//! Draws the retained grid with ratatui.
//!
//! Contains functions for calculating column widths, building the table
//! widget from grid cells, and the title and key-hint strings. Marked
//! rows and the selection get their styles applied here at draw time, so
//! marking never waits for the next data refresh.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, TableState},
};

use crate::data::Align;
use crate::grid::CellGrid;
use crate::table::Table;

/// Calculate auto-sized column widths from the grid.
/// Returns width for each column sized to fit the widest content + 1 for
/// padding. Widths count characters, not bytes, so a sort glyph in a
/// header costs one cell.
pub fn calculate_auto_widths(grid: &CellGrid) -> Vec<u16> {
    let num_cols = grid.column_count();
    let mut widths = vec![0usize; num_cols];

    for (i, cell) in grid.header().iter().enumerate() {
        widths[i] = widths[i].max(cell.text.chars().count());
    }

    for row in grid.rows() {
        for (i, cell) in row.cells.iter().enumerate() {
            if i < num_cols {
                widths[i] = widths[i].max(cell.text.chars().count());
            }
        }
    }

    widths.iter().map(|w| (*w + 1) as u16).collect()
}

fn alignment_for(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Right => Alignment::Right,
    }
}

/// Render the table into `area`, syncing the widget state with the
/// identity-anchored selection.
pub fn draw_table(frame: &mut Frame, area: Rect, table: &Table, state: &mut TableState) {
    let grid = table.grid();
    let styles = table.styles();

    let widths: Vec<Constraint> = calculate_auto_widths(grid)
        .into_iter()
        .map(Constraint::Length)
        .collect();

    let header_cells: Vec<Cell> = grid
        .header()
        .iter()
        .map(|cell| {
            Cell::from(Text::from(cell.text.as_str()).alignment(alignment_for(cell.align)))
                .style(cell.style)
        })
        .collect();
    let header_row = Row::new(header_cells);

    let data_rows: Vec<Row> = grid
        .rows()
        .iter()
        .map(|row| {
            let marked = table.is_marked(&row.id);
            let cells: Vec<Cell> = row
                .cells
                .iter()
                .map(|cell| {
                    let style = if marked {
                        cell.style.patch(styles.marked)
                    } else {
                        cell.style
                    };
                    Cell::from(
                        Text::from(cell.text.as_str()).alignment(alignment_for(cell.align)),
                    )
                    .style(style)
                })
                .collect();
            Row::new(cells)
        })
        .collect();

    // TableState indexes data rows from zero; grid index 0 is the header.
    state.select(table.selected_row_index().map(|i| i - 1));

    let widget = TableWidget::new(data_rows, widths)
        .header(header_row)
        .block(
            Block::default()
                .title(build_title(table))
                .borders(Borders::ALL),
        )
        .row_highlight_style(styles.selection)
        .highlight_symbol(">> ");

    frame.render_stateful_widget(widget, area, state);
}

/// Build the pane title: ` source(namespace)[rows] `.
pub fn build_title(table: &Table) -> String {
    let count = table.grid().data_row_count();
    match table.data().map(|d| d.namespace()) {
        Some(ns) if !ns.is_empty() => format!(" {}({})[{}] ", table.source(), ns, count),
        _ => format!(" {}[{}] ", table.source(), count),
    }
}

/// Build the controls hint string, including any custom sort bindings.
pub fn build_controls_hint(table: &Table) -> String {
    let mut hint = String::from(
        "j/k: move, g/G: top/bottom, Space: mark, w: wide, Ctrl-S: save, Ctrl-K: kill, q: quit",
    );
    let mut binds: Vec<String> = table
        .actions()
        .iter()
        .map(|(combo, action)| format!("{}: {}", combo, action.description))
        .collect();
    binds.sort();
    for bind in binds {
        hint.push_str(", ");
        hint.push_str(&bind);
    }
    hint
}

/// Render the bottom hint bar.
pub fn render_hint_bar(frame: &mut Frame, area: Rect, table: &Table) {
    let hint =
        Paragraph::new(build_controls_hint(table)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, area);
}
