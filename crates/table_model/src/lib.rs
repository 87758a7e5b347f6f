//! Table Model - the canonical data table behind every chart
//!
//! This crate provides:
//! - A validated `Table` (header row + numeric data rows)
//! - Parsers for CSV, manually typed text, JSON and XLSX input
//! - A single `parse` entrypoint keyed by `TableFormat`

mod error;
mod table;
mod csv_parser;
mod json_parser;
mod xlsx_parser;

pub use error::*;
pub use table::*;
pub use csv_parser::detect_delimiter;

use serde::{Deserialize, Serialize};

/// Input formats accepted by [`parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Delimited text with quoting; the delimiter is detected from the header line
    Csv,
    /// Hand-typed comma separated lines, no quoting
    Manual,
    /// Array of objects or array of arrays
    Json,
    /// First worksheet of an Office Open XML workbook
    Xlsx,
}

impl TableFormat {
    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" => Some(TableFormat::Csv),
            "txt" => Some(TableFormat::Manual),
            "json" => Some(TableFormat::Json),
            "xlsx" | "xlsm" => Some(TableFormat::Xlsx),
            _ => None,
        }
    }
}

/// Parse raw input into a validated table.
///
/// Any structural or numeric problem rejects the whole input.
pub fn parse(raw: &[u8], format: TableFormat) -> ParseResult<Table> {
    let rows = match format {
        TableFormat::Csv => {
            let text = decode_text(raw)?;
            csv_parser::parse_csv(text, detect_delimiter(text))?
        }
        TableFormat::Manual => csv_parser::parse_manual(decode_text(raw)?),
        TableFormat::Json => json_parser::parse_json(decode_text(raw)?)?,
        TableFormat::Xlsx => xlsx_parser::parse_xlsx(raw)?,
    };

    let table = Table::from_rows(rows)?;
    tracing::debug!(
        format = ?format,
        categories = table.category_count(),
        series = table.series_count(),
        "parsed table"
    );
    Ok(table)
}

fn decode_text(raw: &[u8]) -> ParseResult<&str> {
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(raw);
    Ok(std::str::from_utf8(raw)?)
}
