//! Outlier detector trait definition.

use crate::error::Result;
use crate::model::OutlierLabel;

/// Scores and labels produced by [`OutlierDetector::detect`], aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub scores: Vec<f64>,
    pub labels: Vec<OutlierLabel>,
    pub threshold: f64,
}

/// Outlier detector trait.
///
/// Implementations label one-dimensional values as normal or anomalous.
pub trait OutlierDetector: Send + Sync {
    /// Fit the detector to training data.
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Score and label data against the fitted model.
    fn detect(&self, data: &[f64]) -> Result<Detection>;

    /// Compute anomaly scores without thresholding.
    fn score(&self, data: &[f64]) -> Result<Vec<f64>>;

    /// Check if detector has been fitted.
    fn is_fitted(&self) -> bool;

    /// Fit on `data` and label the same data.
    fn fit_detect(&mut self, data: &[f64]) -> Result<Detection> {
        self.fit(data)?;
        self.detect(data)
    }
}
