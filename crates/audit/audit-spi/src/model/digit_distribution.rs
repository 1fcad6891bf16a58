//! First-digit distribution result types.

use serde::{Deserialize, Serialize};

/// Observed and expected frequency of one leading digit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigitFrequency {
    /// Leading digit, 1 through 9.
    pub digit: u8,
    /// Benford probability `log10(1 + 1/d)`.
    pub expected: f64,
    /// Fraction of valid values with this leading digit.
    pub observed: f64,
    /// Number of values with this leading digit.
    pub count: usize,
}

impl DigitFrequency {
    /// Absolute gap between observed and expected frequency.
    pub fn deviation(&self) -> f64 {
        (self.observed - self.expected).abs()
    }
}

/// Risk verdict derived from a deviation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskVerdict {
    /// Distribution looks natural.
    LowRisk,
    /// Distribution departs from Benford; possible manipulation.
    HighRisk,
}

impl RiskVerdict {
    /// Verdict for `mad` under `threshold`. A score equal to the threshold is low risk.
    pub fn from_mad(mad: f64, threshold: f64) -> Self {
        if mad > threshold {
            RiskVerdict::HighRisk
        } else {
            RiskVerdict::LowRisk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskVerdict::LowRisk => "LOW RISK: natural distribution",
            RiskVerdict::HighRisk => "HIGH RISK: possible manipulation",
        }
    }
}

impl std::fmt::Display for RiskVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Leading-digit distribution of a column compared to Benford's Law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitDistribution {
    /// One entry per digit, 1 through 9.
    pub digits: Vec<DigitFrequency>,
    /// Number of values that had a valid leading digit.
    pub total: usize,
    /// Mean absolute deviation over the nine digits.
    pub mad: f64,
}

impl DigitDistribution {
    /// Risk verdict under the given MAD threshold.
    pub fn verdict(&self, threshold: f64) -> RiskVerdict {
        RiskVerdict::from_mad(self.mad, threshold)
    }

    /// Frequency entry for digit `d` (1..=9).
    pub fn digit(&self, d: u8) -> Option<&DigitFrequency> {
        self.digits.iter().find(|f| f.digit == d)
    }

    /// Digit with the largest absolute deviation.
    pub fn most_deviant(&self) -> Option<&DigitFrequency> {
        self.digits
            .iter()
            .max_by(|a, b| a.deviation().total_cmp(&b.deviation()))
    }
}
