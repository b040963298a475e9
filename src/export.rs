//! View export for CSV and JSON dumps.
//!
//! Exports the grid exactly as rendered: visible columns only, in
//! display order, including any fading deleted rows still on screen.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::data::SourceId;
use crate::grid::CellGrid;

/// Export format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// UTF-8 BOM (Byte Order Mark) for Excel compatibility
const UTF8_BOM: &str = "\u{FEFF}";

/// Serialize the rendered grid in the requested format.
pub fn export_grid(grid: &CellGrid, format: ExportFormat) -> Result<String, String> {
    match format {
        ExportFormat::Csv => export_csv(grid),
        ExportFormat::Json => export_json(grid),
    }
}

/// Header text without the sort indicator glyph.
fn header_name(text: &str) -> &str {
    text.trim_end_matches(['↑', '↓'])
}

fn export_csv(grid: &CellGrid) -> Result<String, String> {
    // A grid with no columns yet has nothing to write.
    if grid.column_count() == 0 {
        return Ok(UTF8_BOM.to_string());
    }
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let headers: Vec<&str> = grid.header().iter().map(|c| header_name(&c.text)).collect();
    wtr.write_record(&headers)
        .map_err(|e| format!("Failed to write CSV headers: {}", e))?;

    for row in grid.rows() {
        let values: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        wtr.write_record(&values)
            .map_err(|e| format!("Failed to write CSV row: {}", e))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| format!("Failed to finalize CSV: {}", e))?;

    let csv_content =
        String::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8 in CSV output: {}", e))?;

    // Prepend UTF-8 BOM for Excel compatibility
    Ok(format!("{}{}", UTF8_BOM, csv_content))
}

fn export_json(grid: &CellGrid) -> Result<String, String> {
    let headers: Vec<&str> = grid.header().iter().map(|c| header_name(&c.text)).collect();

    let mut rows_json: Vec<serde_json::Map<String, serde_json::Value>> = Vec::new();
    for row in grid.rows() {
        let mut row_obj = serde_json::Map::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.cells.get(i).map(|c| c.text.as_str()).unwrap_or("");
            row_obj.insert(header.to_string(), serde_json::Value::from(value));
        }
        rows_json.push(row_obj);
    }

    serde_json::to_string_pretty(&rows_json).map_err(|e| format!("Failed to serialize JSON: {}", e))
}

/// Timestamped dump file name for a source.
fn dump_file_name(source: &SourceId, format: ExportFormat) -> String {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let tag = source.as_str().replace('/', "-");
    format!("{tag}-{stamp}.{}", format.extension())
}

/// Export the grid into a timestamped file under `dir`.
/// Returns the path written.
pub fn save_view(
    grid: &CellGrid,
    dir: &Path,
    source: &SourceId,
    format: ExportFormat,
) -> Result<PathBuf, String> {
    let content = export_grid(grid, format)?;
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create dump dir '{}': {}", dir.display(), e))?;
    let path = dir.join(dump_file_name(source, format));
    fs::write(&path, content)
        .map_err(|e| format!("Failed to write file '{}': {}", path.display(), e))?;
    Ok(path)
}
