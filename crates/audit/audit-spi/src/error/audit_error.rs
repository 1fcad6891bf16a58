//! Audit error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Audit errors.
///
/// Every failure the analysis core can report is one of these variants, so a
/// caller never has to read meaning into a NaN or a zero score.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AuditError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column is not numeric: {0}")]
    NonNumericColumn(String),

    #[error("Cannot compute digit distribution: required {required} values with a leading digit, got {got}")]
    CannotCompute { required: usize, got: usize },

    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Insufficient data: column has zero variance")]
    ZeroVariance,

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Detector not fitted: call fit() before score()")]
    NotFitted,

    #[error("Row has {got} cells, dataset has {expected} columns")]
    RowArity { expected: usize, got: usize },
}

impl AuditError {
    /// Shorthand for an [`AuditError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for the outcomes that mean "not enough usable data".
    pub fn is_data_shortage(&self) -> bool {
        matches!(
            self,
            Self::CannotCompute { .. } | Self::InsufficientData { .. } | Self::ZeroVariance
        )
    }
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
