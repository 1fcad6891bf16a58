//! Audit pipeline running both analyses on one monetary column.

use audit_api::AuditConfig;
use audit_spi::{
    AuditReport, Dataset, DatasetSummary, DigitAnalyzer, DigitDistribution, OutlierDetector,
    OutlierResult, Result, ScoredRow,
};
use tracing::{info, info_span};

use crate::benford::BenfordAnalyzer;
use crate::isolation::IsolationForest;
use crate::selection::MonetaryColumn;

/// Runs the digit distribution and outlier analyses.
///
/// Holds configuration only; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Auditor {
    config: AuditConfig,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Select and pre-filter `column` under the configured zero policy.
    pub fn select(&self, dataset: &Dataset, column: &str) -> Result<MonetaryColumn> {
        MonetaryColumn::select(dataset, column, self.config.zero_policy)
    }

    /// Digit distribution of `column`.
    pub fn digits(&self, dataset: &Dataset, column: &str) -> Result<DigitDistribution> {
        let selected = self.select(dataset, column)?;
        self.digits_of(&selected)
    }

    /// Outlier labels for `column`.
    pub fn outliers(&self, dataset: &Dataset, column: &str) -> Result<OutlierResult> {
        let selected = self.select(dataset, column)?;
        self.outliers_of(&selected)
    }

    pub fn digits_of(&self, column: &MonetaryColumn) -> Result<DigitDistribution> {
        BenfordAnalyzer::new(self.config.benford)?.analyze(column.values())
    }

    pub fn outliers_of(&self, column: &MonetaryColumn) -> Result<OutlierResult> {
        let mut forest = IsolationForest::new(self.config.isolation)?;
        let detection = forest.fit_detect(column.values())?;

        let rows = column
            .row_indices()
            .iter()
            .zip(column.values())
            .zip(detection.scores.iter().zip(detection.labels))
            .map(|((&row_index, &value), (&score, label))| ScoredRow {
                row_index,
                value,
                score,
                label,
            })
            .collect();
        Ok(OutlierResult::new(rows, detection.threshold))
    }

    /// Run both analyses on `column`.
    ///
    /// Column errors are returned directly. A failure inside either analysis
    /// is recorded in the report and does not stop the other one.
    pub fn run(&self, dataset: &Dataset, column: &str) -> Result<AuditReport> {
        let _span = info_span!("audit", column).entered();

        let summary = DatasetSummary::of(dataset, column)?;
        let selected = self.select(dataset, column)?;

        let digits = self.digits_of(&selected);
        let verdict = digits
            .as_ref()
            .ok()
            .map(|d| d.verdict(self.config.benford.risk_threshold));
        let outliers = self.outliers_of(&selected);

        info!(
            rows = summary.row_count,
            analysed = selected.len(),
            mad = digits.as_ref().map(|d| d.mad).ok(),
            anomalies = outliers.as_ref().map(OutlierResult::anomaly_count).ok(),
            "audit finished"
        );

        Ok(AuditReport {
            column: column.to_string(),
            summary,
            analysed_rows: selected.len(),
            digits: digits.into(),
            verdict,
            outliers: outliers.into(),
        })
    }
}
