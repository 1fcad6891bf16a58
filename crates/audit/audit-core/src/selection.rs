//! Monetary column selection and pre-filtering.

use audit_api::ZeroPolicy;
use audit_spi::{Dataset, Result};
use tracing::debug;

/// Values of one numeric column that passed the monetary pre-filter,
/// each paired with its row index in the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MonetaryColumn {
    name: String,
    row_indices: Vec<usize>,
    values: Vec<f64>,
    dropped: usize,
}

impl MonetaryColumn {
    /// Select `column` from `dataset` and keep the rows that carry an amount.
    ///
    /// Fails with `ColumnNotFound` or `NonNumericColumn` before anything is
    /// filtered. Empty cells, negative and non-finite amounts are dropped;
    /// zero amounts follow `zero_policy`.
    pub fn select(dataset: &Dataset, column: &str, zero_policy: ZeroPolicy) -> Result<Self> {
        let cells = dataset.column_values(column)?;
        let total = cells.len();

        let (row_indices, values): (Vec<usize>, Vec<f64>) = cells
            .into_iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|v| (idx, v)))
            .filter(|&(_, v)| keeps(v, zero_policy))
            .unzip();

        let dropped = total - values.len();
        debug!(column, kept = values.len(), dropped, ?zero_policy, "monetary column selected");

        Ok(Self {
            name: column.to_string(),
            row_indices,
            values,
            dropped,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Source row index of each value.
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows removed by the pre-filter.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Filtered copy of the source rows.
    pub fn filtered(&self, dataset: &Dataset) -> Dataset {
        dataset.select_rows(&self.row_indices)
    }
}

fn keeps(value: f64, zero_policy: ZeroPolicy) -> bool {
    if !value.is_finite() {
        return false;
    }
    match zero_policy {
        ZeroPolicy::Exclude => value > 0.0,
        ZeroPolicy::Retain => value >= 0.0,
    }
}
