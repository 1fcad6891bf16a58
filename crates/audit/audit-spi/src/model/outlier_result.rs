//! Outlier detection result types.

use serde::{Deserialize, Serialize};

use super::dataset::{CellValue, Dataset};
use crate::error::Result;

/// Column appended by [`OutlierResult::augment`] holding the anomaly score.
pub const SCORE_COLUMN: &str = "anomaly_score";
/// Column appended by [`OutlierResult::augment`] holding the label indicator.
pub const LABEL_COLUMN: &str = "anomaly_label";

/// Label assigned to an analysed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutlierLabel {
    Normal,
    Anomalous,
}

impl OutlierLabel {
    /// Conventional indicator: `1` for normal, `-1` for isolated rows.
    pub fn indicator(&self) -> i8 {
        match self {
            OutlierLabel::Normal => 1,
            OutlierLabel::Anomalous => -1,
        }
    }

    pub fn is_anomalous(&self) -> bool {
        matches!(self, OutlierLabel::Anomalous)
    }
}

/// One analysed row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    /// Position of the row in the source dataset.
    pub row_index: usize,
    /// Value of the selected column.
    pub value: f64,
    /// Anomaly score in (0, 1]; near 1 means strongly isolated.
    pub score: f64,
    pub label: OutlierLabel,
}

/// Point for a scatter view: x is the row index, y the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: usize,
    pub y: f64,
    pub label: OutlierLabel,
}

/// Scored and labelled rows of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierResult {
    pub rows: Vec<ScoredRow>,
    /// Score threshold; rows scoring strictly above it are anomalous.
    pub threshold: f64,
}

impl OutlierResult {
    /// Create a new outlier result.
    pub fn new(rows: Vec<ScoredRow>, threshold: f64) -> Self {
        Self { rows, threshold }
    }

    /// Count of anomalous rows.
    pub fn anomaly_count(&self) -> usize {
        self.rows.iter().filter(|r| r.label.is_anomalous()).count()
    }

    /// Anomalous rows, in row order.
    pub fn anomalies(&self) -> impl Iterator<Item = &ScoredRow> {
        self.rows.iter().filter(|r| r.label.is_anomalous())
    }

    /// Source-dataset indices of anomalous rows.
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.anomalies().map(|r| r.row_index).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.score).collect()
    }

    pub fn labels(&self) -> Vec<OutlierLabel> {
        self.rows.iter().map(|r| r.label).collect()
    }

    pub fn scatter_points(&self) -> Vec<ScatterPoint> {
        self.rows
            .iter()
            .map(|r| ScatterPoint {
                x: r.row_index,
                y: r.value,
                label: r.label,
            })
            .collect()
    }

    /// Copy of the analysed rows of `dataset` with score and label columns appended.
    pub fn augment(&self, dataset: &Dataset) -> Result<Dataset> {
        let indices: Vec<usize> = self.rows.iter().map(|r| r.row_index).collect();
        let scores = self.rows.iter().map(|r| CellValue::Number(r.score)).collect();
        let labels = self
            .rows
            .iter()
            .map(|r| CellValue::Number(f64::from(r.label.indicator())))
            .collect();
        dataset
            .select_rows(&indices)
            .with_column(SCORE_COLUMN, scores)?
            .with_column(LABEL_COLUMN, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    fn sample() -> OutlierResult {
        OutlierResult::new(
            vec![
                ScoredRow { row_index: 0, value: 10.0, score: 0.42, label: OutlierLabel::Normal },
                ScoredRow { row_index: 2, value: 9000.0, score: 0.81, label: OutlierLabel::Anomalous },
                ScoredRow { row_index: 3, value: 11.0, score: 0.40, label: OutlierLabel::Normal },
            ],
            0.6,
        )
    }

    #[test]
    fn test_indicator_values() {
        assert_eq!(OutlierLabel::Normal.indicator(), 1);
        assert_eq!(OutlierLabel::Anomalous.indicator(), -1);
    }

    #[test]
    fn test_anomaly_helpers() {
        let result = sample();
        assert_eq!(result.anomaly_count(), 1);
        assert_eq!(result.anomaly_indices(), vec![2]);
        assert_eq!(result.scores(), vec![0.42, 0.81, 0.40]);
        assert_eq!(result.labels()[1], OutlierLabel::Anomalous);
    }

    #[test]
    fn test_scatter_points_use_source_index() {
        let points = sample().scatter_points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].x, 2);
        assert_eq!(points[1].y, 9000.0);
    }

    #[test]
    fn test_augment_appends_columns() {
        let dataset = Dataset::from_values("amount", &[10.0, -5.0, 9000.0, 11.0]);
        let augmented = sample().augment(&dataset).unwrap();
        assert_eq!(augmented.len(), 3);
        assert_eq!(augmented.columns(), &["amount", SCORE_COLUMN, LABEL_COLUMN]);
        let flagged = augmented.row(1).unwrap();
        assert_eq!(flagged.get("amount").and_then(CellValue::as_f64), Some(9000.0));
        assert_eq!(flagged.get(LABEL_COLUMN).and_then(CellValue::as_f64), Some(-1.0));
    }

    #[test]
    fn test_augment_rejects_existing_score_column() {
        let dataset = Dataset::from_rows(
            ["amount", SCORE_COLUMN],
            (0..4)
                .map(|i| vec![CellValue::Number(10.0 + i as f64), CellValue::Number(0.0)])
                .collect(),
        )
        .unwrap();
        assert_eq!(
            sample().augment(&dataset).unwrap_err(),
            AuditError::InvalidInput(format!("column '{}' already exists", SCORE_COLUMN))
        );
    }
}
