//! The canonical chart table
//!
//! Row 0 is the header: the category-axis title followed by one name per
//! series. Every following row is a category label followed by one finite
//! number per series. A `Table` value always satisfies these rules.

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A validated header + numeric data table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Table {
    rows: Vec<Vec<String>>,
    values: Vec<Vec<f64>>,
}

impl Table {
    /// Build a table from raw string rows, trimming every cell.
    ///
    /// A single failing cell rejects the whole table.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.trim().to_string()).collect())
            .collect();

        let header = rows.first().ok_or(TableError::Empty)?;
        let width = header.len();
        if width < 2 {
            return Err(TableError::MissingSeries(width));
        }
        if rows.len() < 2 {
            return Err(TableError::NoDataRows);
        }

        let mut values = Vec::with_capacity(rows.len() - 1);
        for (row_idx, row) in rows.iter().enumerate().skip(1) {
            if row.len() != width {
                return Err(TableError::RowLengthMismatch {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            let parsed = row[1..]
                .iter()
                .enumerate()
                .map(|(offset, cell)| {
                    parse_number(cell).ok_or_else(|| TableError::NonNumericCell {
                        row: row_idx,
                        column: offset + 1,
                        value: cell.clone(),
                    })
                })
                .collect::<Result<Vec<f64>, TableError>>()?;
            values.push(parsed);
        }

        Ok(Self { rows, values })
    }

    /// Title of the category axis (first header cell)
    pub fn category_title(&self) -> &str {
        &self.rows[0][0]
    }

    /// Series names in column order
    pub fn series_names(&self) -> &[String] {
        &self.rows[0][1..]
    }

    pub fn series_count(&self) -> usize {
        self.rows[0].len() - 1
    }

    pub fn category_count(&self) -> usize {
        self.values.len()
    }

    /// Category label of a data row (0-based, header excluded)
    pub fn category(&self, index: usize) -> Option<&str> {
        self.rows.get(index + 1).map(|row| row[0].as_str())
    }

    /// All category labels in row order
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows[1..].iter().map(|row| row[0].as_str())
    }

    /// Value of a series at a category
    pub fn value(&self, category: usize, series: usize) -> Option<f64> {
        self.values.get(category)?.get(series).copied()
    }

    /// Every value of one series, in category order
    pub fn series_values(&self, series: usize) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|row| row.get(series).copied())
            .collect()
    }

    /// The trimmed string rows, header included
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl TryFrom<Vec<Vec<String>>> for Table {
    type Error = TableError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Table::from_rows(rows)
    }
}

impl From<Table> for Vec<Vec<String>> {
    fn from(table: Table) -> Self {
        table.rows
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
