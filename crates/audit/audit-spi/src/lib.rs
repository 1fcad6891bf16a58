//! Audit Service Provider Interface
//!
//! Defines traits and types shared by the transaction audit analyzers.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Detection, DigitAnalyzer, OutlierDetector};
pub use error::{AuditError, Result};
pub use model::{
    AuditReport, CellValue, ColumnKind, Dataset, DatasetSummary, DigitDistribution,
    DigitFrequency, Outcome, OutlierLabel, OutlierResult, RiskVerdict, Row, ScatterPoint,
    ScoredRow, LABEL_COLUMN, SCORE_COLUMN,
};
