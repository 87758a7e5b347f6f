//! Error types for table parsing and validation

use thiserror::Error;

/// Structural problems that prevent a table from being built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table has no rows")]
    Empty,

    #[error("Header needs a category column and at least one series column, found {0} cell(s)")]
    MissingSeries(usize),

    #[error("Table has a header but no data rows")]
    NoDataRows,

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cell at row {row}, column {column} is not a finite number: {value:?}")]
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },
}

/// Errors raised while turning raw input into a table
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX parse error: {0}")]
    Xlsx(String),

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Unsupported input shape: {0}")]
    UnsupportedShape(String),

    #[error("Invalid table: {0}")]
    Invalid(#[from] TableError),
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
