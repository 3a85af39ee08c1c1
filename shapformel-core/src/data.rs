//! Tabular frames shared by the dataset and the explained instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A table of JSON scalar cells with named columns.
///
/// Used both for the reference dataset and for the single-row instance
/// being explained. Rows are stored row-major; a row shorter than the
/// header is treated as having missing cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Build a frame from column names given as string slices.
    pub fn from_columns(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `(row, column name)`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// All cells of a named column, in row order. Missing cells are skipped.
    pub fn column_values<'a>(&'a self, column: &str) -> Vec<&'a Value> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().filter_map(|row| row.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Numeric view of a column. Returns `None` as soon as a cell is not a number.
    pub fn numeric_column(&self, column: &str) -> Option<Vec<f64>> {
        self.column_values(column)
            .into_iter()
            .map(Value::as_f64)
            .collect()
    }

    /// Copy of this frame with one column removed.
    pub fn without_column(&self, column: &str) -> Frame {
        let Some(idx) = self.column_index(column) else {
            return self.clone();
        };
        let columns = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, c)| c.clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != idx)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect();
        Frame { columns, rows }
    }

    /// Column names with `column` removed, order preserved.
    pub fn feature_names(&self, target: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != target)
            .cloned()
            .collect()
    }

    /// Whether any cell is `null` or absent from a short row.
    pub fn has_missing_values(&self) -> bool {
        let width = self.columns.len();
        self.rows
            .iter()
            .any(|row| row.len() < width || row.iter().any(Value::is_null))
    }
}

/// Render a cell the way it should appear in narrative text: strings
/// without quotes, everything else in its JSON form.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality used for category membership: numbers compare by value so that
/// `0` and `0.0` fall in the same category.
pub fn cells_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
