//! XLSX parsing: reads the first worksheet of a workbook

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::error::{ParseError, ParseResult};

pub(crate) fn parse_xlsx(bytes: &[u8]) -> ParseResult<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ParseError::Xlsx(format!("Failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Xlsx("Workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Xlsx(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    tracing::debug!(sheet = %sheet_name, rows = rows.len(), "read worksheet");
    Ok(trim_empty_columns(rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Drop trailing columns that are empty in every row
fn trim_empty_columns(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let used = rows
        .iter()
        .filter_map(|row| row.iter().rposition(|cell| !cell.is_empty()))
        .max()
        .map_or(0, |last| last + 1);
    for row in &mut rows {
        row.truncate(used);
    }
    rows
}
