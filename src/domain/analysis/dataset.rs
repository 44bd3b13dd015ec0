//! In-memory tabular dataset handed to the analysis pipeline.

use serde::{Deserialize, Serialize};

/// A header row plus data rows. Rows are kept as read, even when their width
/// does not match the header; the pipeline reports those as row errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<DatasetRow>,
}

/// One data row. `index` is the zero-based position in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub index: usize,
    pub cells: Vec<Option<String>>,
}

impl DatasetRow {
    pub fn new(index: usize, cells: Vec<Option<String>>) -> Self {
        Self { index, cells }
    }

    /// Cell value, `None` when missing or out of range.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-blank value parses as a number.
    Numeric,
    /// At least one non-blank value is not a number.
    Text,
    /// No non-blank values at all.
    Empty,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| DatasetRow::new(index, cells))
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor where every cell is present; blank strings
    /// become missing cells.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| Some(cell.to_string()).filter(|c| !c.trim().is_empty()))
                        .collect()
                })
                .collect(),
        )
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only the first `size` rows.
    pub fn truncate(&mut self, size: usize) {
        self.rows.truncate(size);
    }

    /// Infers the kind of every header column from the row values.
    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        (0..self.headers.len())
            .map(|column| {
                let mut kind = ColumnKind::Empty;
                for value in self.rows.iter().filter_map(|row| row.get(column)) {
                    let value = value.trim();
                    if value.is_empty() {
                        continue;
                    }
                    if value.replace(',', "").parse::<f64>().is_ok() {
                        kind = ColumnKind::Numeric;
                    } else {
                        return ColumnKind::Text;
                    }
                }
                kind
            })
            .collect()
    }
}
