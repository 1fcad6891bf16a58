//! Combined audit report.

use serde::{Deserialize, Serialize};

use super::dataset::DatasetSummary;
use super::digit_distribution::{DigitDistribution, RiskVerdict};
use super::outlier_result::OutlierResult;
use crate::error::{AuditError, Result};

/// Outcome of one analysis inside a report.
///
/// The two analyses are independent, so a failure of one is recorded here
/// instead of aborting the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Completed(T),
    Failed(AuditError),
}

impl<T> Outcome<T> {
    pub fn as_completed(&self) -> Option<&T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AuditError> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Failed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T> {
        self.into()
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Completed(value),
            Err(err) => Outcome::Failed(err),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Completed(value) => Ok(value),
            Outcome::Failed(err) => Err(err),
        }
    }
}

/// Result of running both analyses on one monetary column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Name of the analysed column.
    pub column: String,
    pub summary: DatasetSummary,
    /// Rows that survived the monetary pre-filter.
    pub analysed_rows: usize,
    pub digits: Outcome<DigitDistribution>,
    /// Verdict for `digits` under the configured threshold.
    pub verdict: Option<RiskVerdict>,
    pub outliers: Outcome<OutlierResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        let ok: Outcome<u32> = Ok(3).into();
        assert_eq!(ok.as_completed(), Some(&3));
        assert!(ok.error().is_none());

        let failed: Outcome<u32> = Err(AuditError::ZeroVariance).into();
        assert!(failed.as_completed().is_none());
        assert_eq!(failed.error(), Some(&AuditError::ZeroVariance));
        assert_eq!(failed.into_result(), Err(AuditError::ZeroVariance));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let failed: Outcome<u32> = Outcome::Failed(AuditError::ZeroVariance);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");

        let done: Outcome<u32> = Outcome::Completed(7);
        let json = serde_json::to_value(&done).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["value"], 7);
    }
}
