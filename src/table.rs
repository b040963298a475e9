//! The reactive table component.
//!
//! Owns the displayed snapshot, sort and selection state, the action
//! registry, and the retained grid. A refresh runs in two phases:
//! `update` computes a diffed, sorted view without touching the grid,
//! then `update_ui` writes that view into the grid and re-anchors the
//! selection by row identity. Both must run on the UI loop.

use log::{debug, warn};

use crate::actions::{Action, ActionRegistry, TableCommand};
use crate::config::{Styles, ViewContext, ViewSettings};
use crate::data::{Row, SourceId};
use crate::diff::{diff, RowEvents};
use crate::grid::{CellGrid, GridCell, GridRow};
use crate::keys::KeyCombo;
use crate::model::Tabular;
use crate::selection::SelectionState;
use crate::snapshot::TableData;
use crate::sort::{sort_events, SortState};
use crate::sortkeys::parse_custom_sort_key;

const SORT_ASC_GLYPH: &str = "↑";
const SORT_DESC_GLYPH: &str = "↓";

/// Fired after a user-driven selection change, with the selected id.
pub type SelectionChangedFn = Box<dyn FnMut(Option<&str>)>;

/// What the next render should show. Produced by `Table::update`,
/// consumed by `Table::update_ui`.
#[derive(Debug, Clone)]
pub struct ComputedView {
    /// Diffed, sorted events in display order.
    pub events: RowEvents,
    /// Visible column indices into the snapshot header.
    pub columns: Vec<usize>,
    /// Whether the grid content was rebuilt from scratch.
    pub full_redraw: bool,
}

/// A live table bound to one data source.
pub struct Table {
    source: SourceId,
    data: Option<TableData>,
    sort: SortState,
    selection: SelectionState,
    sel_column: usize,
    actions: ActionRegistry,
    grid: CellGrid,
    model: Option<Box<dyn Tabular>>,
    styles: Styles,
    settings: ViewSettings,
    wide: bool,
    selection_changed: Option<SelectionChangedFn>,
}

impl Table {
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            data: None,
            sort: SortState::default(),
            selection: SelectionState::new(),
            sel_column: 0,
            actions: ActionRegistry::new(),
            grid: CellGrid::new(),
            model: None,
            styles: Styles::default(),
            settings: ViewSettings::default(),
            wide: false,
            selection_changed: None,
        }
    }

    /// Bind styles and per-source view settings, and register any
    /// configured custom sort keys.
    pub fn init(&mut self, ctx: &ViewContext) {
        self.styles = ctx.styles.clone();
        let settings = ctx.settings_for(&self.source);
        self.register_custom_sort_keys(&settings);
        self.settings = settings;
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn data(&self) -> Option<&TableData> {
        self.data.as_ref()
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn is_wide(&self) -> bool {
        self.wide
    }

    /// Bind a data source. The diff baseline resets so the next
    /// snapshot rebuilds the grid from scratch.
    pub fn set_model(&mut self, model: Box<dyn Tabular>) {
        self.data = None;
        self.grid.clear();
        self.selection.clear();
        self.selection.clear_marks();
        self.model = Some(model);
    }

    pub fn model(&self) -> Option<&dyn Tabular> {
        self.model.as_deref()
    }

    // The dyn bound stays 'static: &mut is invariant, so an elided
    // bound would not coerce down from the boxed model's.
    pub fn model_mut(&mut self) -> Option<&mut (dyn Tabular + 'static)> {
        self.model.as_deref_mut()
    }

    pub fn set_selection_changed_fn(&mut self, f: SelectionChangedFn) {
        self.selection_changed = Some(f);
    }

    /// Phase 1: diff the snapshot against the displayed baseline, sort,
    /// and resolve visible columns. Pure compute; the grid is untouched.
    pub fn update(&self, data: &TableData, force: bool) -> ComputedView {
        let full_redraw = force
            || self
                .data
                .as_ref()
                .is_none_or(|prev| !prev.header().shape_matches(data.header()));

        let baseline = if full_redraw { None } else { self.data.as_ref() };
        let mut events = diff(baseline, data);

        if let Some(column) = self.resolve_sort_column(data) {
            sort_events(&mut events, data.header(), column, self.sort.ascending);
        }

        let columns = self.visible_columns(data);
        debug!(
            "update {}: gen {} rows {} full_redraw {}",
            self.source,
            data.generation(),
            events.len(),
            full_redraw
        );

        ComputedView {
            events,
            columns,
            full_redraw,
        }
    }

    /// Phase 2: write the computed view into the grid, re-anchor the
    /// selection against the new rendered order, and retain the raw
    /// snapshot as the next diff baseline.
    pub fn update_ui(&mut self, view: ComputedView, data: TableData) {
        let sorted = self.resolve_sort_column(&data);

        self.grid.clear();
        let header_cells = view
            .columns
            .iter()
            .map(|&i| {
                let column = data.header().column(i);
                let mut text = column.map(|c| c.name.clone()).unwrap_or_default();
                if sorted == Some(i) {
                    text.push_str(if self.sort.ascending {
                        SORT_ASC_GLYPH
                    } else {
                        SORT_DESC_GLYPH
                    });
                }
                let align = column.map(|c| c.align).unwrap_or_default();
                GridCell::new(text, self.styles.header).aligned(align)
            })
            .collect();
        self.grid.set_header(header_cells);

        for event in view.events.iter() {
            let style = self.styles.for_kind(event.kind);
            let cells = view
                .columns
                .iter()
                .map(|&i| {
                    let align = data
                        .header()
                        .column(i)
                        .map(|c| c.align)
                        .unwrap_or_default();
                    GridCell::new(event.row.field(i).unwrap_or(""), style).aligned(align)
                })
                .collect();
            self.grid.push_row(GridRow {
                id: event.row.id.clone(),
                kind: event.kind,
                cells,
            });
        }

        let grid = &self.grid;
        if self.selection.prune(|id| grid.contains_id(id)) {
            debug!("selection dropped, row left {}", self.source);
        }

        self.data = Some(data);
    }

    /// Re-render the retained snapshot, after sort or view changes.
    pub fn refresh(&mut self) {
        if let Some(data) = self.data.clone() {
            let view = self.update(&data, false);
            self.update_ui(view, data);
        }
    }

    /// Parse and bind every configured sort key. Bad entries are
    /// skipped with a warning; the rest still register.
    pub fn register_custom_sort_keys(&mut self, settings: &ViewSettings) {
        for entry in &settings.sort_keys {
            match parse_custom_sort_key(entry, &settings.columns) {
                Ok((column, combo)) => {
                    self.actions.bind(combo, Action::sort_column(&column));
                }
                Err(err) => warn!("skipping sort key {:?} for {}: {}", entry, self.source, err),
            }
        }
    }

    /// Sort by a column name; repeating toggles direction.
    pub fn sort_by(&mut self, column: &str) {
        self.sort.set_column(column);
        self.refresh();
    }

    pub fn apply(&mut self, command: &TableCommand) {
        match command {
            TableCommand::SortColumn(column) => self.sort_by(column),
        }
    }

    /// Run the action bound to a combo, if any. Returns whether the
    /// combo was bound.
    pub fn handle_key(&mut self, combo: &KeyCombo) -> bool {
        let Some(action) = self.actions.get(combo).cloned() else {
            return false;
        };
        if matches!(action.command, TableCommand::SortColumn(_)) {
            self.sort.key = Some(*combo);
        }
        self.apply(&action.command);
        true
    }

    /// Show or hide wide-only columns.
    pub fn toggle_wide(&mut self) {
        self.wide = !self.wide;
        self.refresh();
    }

    /// Select the row at a 1-based screen index (0 is the header row
    /// and is ignored). `broadcast` fires the selection-changed hook.
    pub fn select_row(&mut self, screen_index: usize, column: usize, broadcast: bool) {
        let Some(row) = self.grid.data_row_at(screen_index) else {
            return;
        };
        let id = row.id.clone();
        self.selection.select(&id);
        self.sel_column = column;
        if broadcast {
            if let Some(cb) = self.selection_changed.as_mut() {
                cb(Some(&id));
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select the first data row, or clear when the view is empty.
    pub fn select_first_row(&mut self) {
        if self.grid.data_row_count() > 0 {
            self.select_row(1, 0, true);
        } else {
            self.selection.clear();
        }
    }

    /// Move the selection by a row delta, clamped to the view.
    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.grid.data_row_count();
        if rows == 0 {
            return;
        }
        let current = self.selected_row_index().unwrap_or(0) as isize;
        let next = (current + delta).clamp(1, rows as isize) as usize;
        self.select_row(next, self.sel_column, true);
    }

    /// Full row for an arbitrary id from the displayed snapshot.
    pub fn row(&self, id: &str) -> Option<Row> {
        self.data
            .as_ref()?
            .events()
            .by_id(id)
            .map(|e| e.row.clone())
    }

    /// Id of the selected row.
    pub fn selected_item(&self) -> Option<&str> {
        self.selection.selected()
    }

    /// Rendered cell text at the selected row.
    pub fn selected_cell(&self, column: usize) -> Option<&str> {
        let index = self.selected_row_index()?;
        let row = self.grid.data_row_at(index)?;
        row.cells.get(column).map(|c| c.text.as_str())
    }

    /// 1-based rendered index of the selected row.
    pub fn selected_row_index(&self) -> Option<usize> {
        self.grid.position_of(self.selection.selected()?)
    }

    pub fn selected_column(&self) -> usize {
        self.sel_column
    }

    /// Marked ids in rendered order, or the selected id alone when
    /// nothing is marked.
    pub fn selected_items(&self) -> Vec<String> {
        if self.selection.has_marks() {
            self.grid
                .ids()
                .filter(|id| self.selection.is_marked(id))
                .map(str::to_string)
                .collect()
        } else {
            self.selection
                .selected()
                .map(str::to_string)
                .into_iter()
                .collect()
        }
    }

    /// Toggle a mark on the selected row.
    pub fn toggle_mark(&mut self) {
        if let Some(id) = self.selection.selected().map(str::to_string) {
            self.selection.toggle_mark(&id);
        }
    }

    pub fn clear_marks(&mut self) {
        self.selection.clear_marks();
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.selection.is_marked(id)
    }

    fn resolve_sort_column(&self, data: &TableData) -> Option<usize> {
        if data.header().is_empty() {
            return None;
        }
        match self.sort.column.as_deref() {
            // A configured column that vanished falls back to the first.
            Some(name) => data.header().index_of(name).or(Some(0)),
            None => Some(0),
        }
    }

    fn visible_columns(&self, data: &TableData) -> Vec<usize> {
        let header = data.header();
        let mut columns: Vec<usize> = if self.settings.columns.is_empty() {
            header
                .iter()
                .enumerate()
                .filter(|(_, c)| self.wide || !c.wide)
                .map(|(i, _)| i)
                .collect()
        } else {
            self.settings
                .columns
                .iter()
                .filter_map(|name| header.index_of(name))
                .collect()
        };
        // Wide mode appends whatever the configured subset left out.
        if self.wide && !self.settings.columns.is_empty() {
            for i in 0..header.len() {
                if !columns.contains(&i) {
                    columns.push(i);
                }
            }
        }
        columns
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("source", &self.source)
            .field("rows", &self.grid.data_row_count())
            .field("sort", &self.sort)
            .field("wide", &self.wide)
            .field("has_model", &self.model.is_some())
            .finish()
    }
}
