//! Loading rows from CSV files and spreadsheets.
//!
//! The first row holds column names (trimmed). Empty cells become absent
//! values, so they blank their field rather than being skipped.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use formfill::Row;

/// Column names plus data rows, in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Load a table, choosing the reader from the file extension.
pub fn load_table(path: &Path) -> Result<Table, String> {
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path, b','),
        "tsv" | "tab" => read_csv(path, b'\t'),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path),
        other => Err(format!(
            "unsupported data file type '{other}' (expected csv, tsv, xlsx, xlsm, xlsb, xls or ods)"
        )),
    }
}

fn read_csv(path: &Path, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| format!("failed to open {}: {e}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| format!("failed to read CSV header: {e}"))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("failed to read CSV record: {e}"))?;
        let cells = record.iter().map(|cell| Some(cell.to_string()));
        rows.push(build_row(&columns, cells));
    }

    Ok(Table { columns, rows })
}

fn read_spreadsheet(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("failed to open spreadsheet {}: {e}", path.display()))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err("spreadsheet has no worksheets".to_string());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| format!("failed to read worksheet '{sheet}': {e}"))?;

    let mut records = range.rows();
    let columns: Vec<String> = match records.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default().trim().to_string())
            .collect(),
        None => return Ok(Table::default()),
    };

    let rows = records
        .filter(|record| record.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|record| build_row(&columns, record.iter().map(cell_text)))
        .collect();

    Ok(Table { columns, rows })
}

/// Pair cells with column names. Empty cells and cells past the end of a
/// short record are absent; cells under an empty column name are dropped.
fn build_row<I>(columns: &[String], cells: I) -> Row
where
    I: Iterator<Item = Option<String>>,
{
    let mut cells = cells;
    let mut row = Row::new();
    for column in columns {
        let value = cells.next().flatten().filter(|v| !v.is_empty());
        if !column.is_empty() {
            row.insert(column.clone(), value);
        }
    }
    row
}

/// Text of a spreadsheet cell, or `None` when the cell is empty.
///
/// Whole floats print without a fractional part so that a zip code stored
/// as a number reads back as `123`, not `123.0`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{f:.0}"))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Some(format!("{dt}")),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(format!("#ERR:{e:?}")),
    }
}
