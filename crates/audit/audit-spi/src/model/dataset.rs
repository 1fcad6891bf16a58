//! Tabular dataset abstraction.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// A single cell of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Numeric value of the cell, if it holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// Inferred column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// At least one number and no text cells.
    Numeric,
    /// Anything else, including all-empty columns.
    Text,
}

/// Borrowed view of one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell under the given column name.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.cells.get(idx))
    }

    /// All cells in column order.
    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }
}

/// An ordered table of rows with named columns.
///
/// Rows are stored positionally; [`Row::get`] resolves a column name to its
/// cell. The analysis core only reads a dataset and hands back filtered
/// copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Unchecked wire form of [`Dataset`].
#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = AuditError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset::from_rows(raw.columns, raw.rows)
    }
}

impl Dataset {
    /// Create an empty dataset with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a dataset from column names and rows, checking row arity.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<CellValue>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    /// Single numeric column dataset, handy for callers holding a plain series.
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Self {
        Self {
            columns: vec![column.into()],
            rows: values.iter().map(|&v| vec![CellValue::Number(v)]).collect(),
        }
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, cells: Vec<CellValue>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(AuditError::RowArity {
                expected: self.columns.len(),
                got: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| AuditError::ColumnNotFound(column.to_string()))
    }

    /// Inferred kind of a column.
    pub fn column_kind(&self, column: &str) -> Result<ColumnKind> {
        let idx = self.column_index(column)?;
        Ok(self.kind_at(idx))
    }

    fn kind_at(&self, idx: usize) -> ColumnKind {
        let mut numbers = 0usize;
        for row in &self.rows {
            match &row[idx] {
                CellValue::Number(_) => numbers += 1,
                CellValue::Text(_) => return ColumnKind::Text,
                CellValue::Empty => {}
            }
        }
        if numbers > 0 {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    /// Names of all numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        (0..self.columns.len())
            .filter(|&idx| self.kind_at(idx) == ColumnKind::Numeric)
            .map(|idx| self.columns[idx].as_str())
            .collect()
    }

    /// Cells of a numeric column, one entry per row (`None` for empty cells).
    pub fn column_values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(column)?;
        if self.kind_at(idx) != ColumnKind::Numeric {
            return Err(AuditError::NonNumericColumn(column.to_string()));
        }
        Ok(self.rows.iter().map(|row| row[idx].as_f64()).collect())
    }

    /// Copy of the rows at `indices`, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Append a column. `cells` must have one entry per row and `name`
    /// must not already be a column.
    pub fn with_column(mut self, name: impl Into<String>, cells: Vec<CellValue>) -> Result<Self> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(AuditError::InvalidInput(format!(
                "column '{}' already exists",
                name
            )));
        }
        if cells.len() != self.rows.len() {
            return Err(AuditError::RowArity {
                expected: self.rows.len(),
                got: cells.len(),
            });
        }
        self.columns.push(name);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        Ok(self)
    }
}

/// Descriptive summary of a dataset and one selected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: Vec<String>,
    /// Sum of the selected column's numeric cells.
    pub column_total: f64,
}

impl DatasetSummary {
    /// Summarize `dataset` with totals taken from `column`.
    pub fn of(dataset: &Dataset, column: &str) -> Result<Self> {
        let column_total = dataset.column_values(column)?.into_iter().flatten().sum();
        Ok(Self {
            row_count: dataset.len(),
            column_count: dataset.column_count(),
            numeric_columns: dataset
                .numeric_columns()
                .into_iter()
                .map(String::from)
                .collect(),
            column_total,
        })
    }
}
