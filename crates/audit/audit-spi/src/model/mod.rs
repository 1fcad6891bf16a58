//! Data models for the audit toolkit.
//!
//! This module contains the dataset abstraction and the result structures
//! produced by the analyzers.

mod audit_report;
mod dataset;
mod digit_distribution;
mod outlier_result;

pub use audit_report::{AuditReport, Outcome};
pub use dataset::{CellValue, ColumnKind, Dataset, DatasetSummary, Row};
pub use digit_distribution::{DigitDistribution, DigitFrequency, RiskVerdict};
pub use outlier_result::{
    OutlierLabel, OutlierResult, ScatterPoint, ScoredRow, LABEL_COLUMN, SCORE_COLUMN,
};
