//! Digit distribution analyzer trait definition.

use crate::error::Result;
use crate::model::DigitDistribution;

/// Compares the leading-digit distribution of values to a reference law.
pub trait DigitAnalyzer: Send + Sync {
    /// Build the distribution of `values`.
    ///
    /// Values without a leading significant digit are skipped, not rejected.
    fn analyze(&self, values: &[f64]) -> Result<DigitDistribution>;

    /// Expected probability of each leading digit 1..=9.
    fn expected(&self) -> [f64; 9];
}
