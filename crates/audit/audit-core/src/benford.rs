//! First-digit analysis against Benford's Law.

use std::sync::OnceLock;

use audit_api::BenfordConfig;
use audit_spi::{AuditError, DigitAnalyzer, DigitDistribution, DigitFrequency, Result};
use tracing::debug;

/// Benford probability of each leading digit, `log10(1 + 1/d)` for d = 1..=9.
pub fn expected_probabilities() -> [f64; 9] {
    static EXPECTED: OnceLock<[f64; 9]> = OnceLock::new();
    *EXPECTED.get_or_init(|| std::array::from_fn(|i| (1.0 + 1.0 / (i as f64 + 1.0)).log10()))
}

/// Expected percentage of each leading digit, for display.
pub fn reference_table() -> Vec<(u8, f64)> {
    expected_probabilities()
        .iter()
        .enumerate()
        .map(|(i, p)| (i as u8 + 1, p * 100.0))
        .collect()
}

/// First significant digit of `value`, ignoring its sign.
///
/// Uses the shortest round-tripping scientific representation, so the first
/// character is always the first significant digit for finite non-zero
/// values. Zero, NaN and infinities have none.
pub fn leading_digit(value: f64) -> Option<u8> {
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    let repr = format!("{:e}", value.abs());
    repr.trim_start_matches(|c: char| c == '0' || c == '.' || c.is_whitespace())
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .filter(|&d| d > 0)
        .map(|d| d as u8)
}

/// Digit distribution analyzer for Benford's Law.
///
/// Only values strictly greater than zero are counted. Anything else is
/// skipped silently and does not enter the denominator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenfordAnalyzer {
    config: BenfordConfig,
}

impl BenfordAnalyzer {
    pub fn new(config: BenfordConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BenfordConfig {
        &self.config
    }

    /// Count of values per leading digit, index 0 holding digit 1.
    pub fn digit_counts(values: &[f64]) -> [usize; 9] {
        let mut counts = [0usize; 9];
        for d in values
            .iter()
            .filter(|&&v| v > 0.0)
            .filter_map(|&v| leading_digit(v))
        {
            counts[d as usize - 1] += 1;
        }
        counts
    }
}

impl DigitAnalyzer for BenfordAnalyzer {
    fn analyze(&self, values: &[f64]) -> Result<DigitDistribution> {
        let counts = Self::digit_counts(values);
        let total: usize = counts.iter().sum();

        if total < self.config.min_values {
            debug!(total, required = self.config.min_values, "too few leading digits");
            return Err(AuditError::CannotCompute {
                required: self.config.min_values,
                got: total,
            });
        }

        let expected = self.expected();
        let digits: Vec<DigitFrequency> = counts
            .iter()
            .zip(expected.iter())
            .enumerate()
            .map(|(i, (&count, &expected))| DigitFrequency {
                digit: i as u8 + 1,
                expected,
                observed: count as f64 / total as f64,
                count,
            })
            .collect();

        let mad = digits.iter().map(DigitFrequency::deviation).sum::<f64>() / digits.len() as f64;

        debug!(
            input = values.len(),
            total,
            mad,
            skipped = values.len() - total,
            "digit distribution computed"
        );

        Ok(DigitDistribution { digits, total, mad })
    }

    fn expected(&self) -> [f64; 9] {
        expected_probabilities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_spi::RiskVerdict;

    #[test]
    fn test_expected_sum_to_one_and_decrease() {
        let p = expected_probabilities();
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        for w in p.windows(2) {
            assert!(w[0] > w[1]);
        }
        assert!((p[0] - 0.30103).abs() < 1e-5);
        assert!((p[8] - 0.04576).abs() < 1e-5);
    }

    #[test]
    fn test_reference_table_percentages() {
        let table = reference_table();
        assert_eq!(table.len(), 9);
        assert_eq!(table[0].0, 1);
        assert!((table[0].1 - 2f64.log10() * 100.0).abs() < 1e-9);
        assert!((table[8].1 - (10f64 / 9.0).log10() * 100.0).abs() < 1e-9);
        assert_eq!(format!("{:.1}", table[1].1), "17.6");
        assert_eq!(format!("{:.1}", table[8].1), "4.6");
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(leading_digit(100.0), Some(1));
        assert_eq!(leading_digit(987.65), Some(9));
        assert_eq!(leading_digit(0.0042), Some(4));
        assert_eq!(leading_digit(-250.0), Some(2));
        assert_eq!(leading_digit(7.0), Some(7));
        assert_eq!(leading_digit(1e-300), Some(1));
        assert_eq!(leading_digit(0.0), None);
        assert_eq!(leading_digit(-0.0), None);
        assert_eq!(leading_digit(f64::NAN), None);
        assert_eq!(leading_digit(f64::INFINITY), None);
    }

    #[test]
    fn test_concentrated_ones_is_high_risk() {
        let analyzer = BenfordAnalyzer::default();
        let dist = analyzer
            .analyze(&[100.0, 150.0, 200.0, 111.0, 123.0, 199.0])
            .unwrap();

        assert_eq!(dist.total, 6);
        assert_eq!(dist.digit(1).unwrap().count, 5);
        assert_eq!(dist.digit(2).unwrap().count, 1);
        assert!((dist.digit(1).unwrap().observed - 5.0 / 6.0).abs() < 1e-12);
        assert!(dist.mad > 0.05);
        assert_eq!(dist.verdict(0.05), RiskVerdict::HighRisk);
    }

    #[test]
    fn test_non_positive_values_do_not_count() {
        let analyzer = BenfordAnalyzer::default();
        let base = analyzer.analyze(&[120.0, 35.0, 4.0]).unwrap();
        let noisy = analyzer
            .analyze(&[120.0, 0.0, 35.0, -900.0, 4.0, f64::NAN])
            .unwrap();
        assert_eq!(base, noisy);
        assert_eq!(noisy.total, 3);
    }

    #[test]
    fn test_no_valid_digits_cannot_compute() {
        let analyzer = BenfordAnalyzer::default();
        assert_eq!(
            analyzer.analyze(&[]).unwrap_err(),
            AuditError::CannotCompute { required: 1, got: 0 }
        );
        assert_eq!(
            analyzer.analyze(&[0.0, -3.0]).unwrap_err(),
            AuditError::CannotCompute { required: 1, got: 0 }
        );
    }

    #[test]
    fn test_min_values_respected() {
        let analyzer = BenfordAnalyzer::new(BenfordConfig::default().with_min_values(5)).unwrap();
        assert_eq!(
            analyzer.analyze(&[1.0, 2.0, 3.0]).unwrap_err(),
            AuditError::CannotCompute { required: 5, got: 3 }
        );
    }

    #[test]
    fn test_observed_sums_to_one() {
        let analyzer = BenfordAnalyzer::default();
        let values: Vec<f64> = (1..=500).map(|i| i as f64 * 3.7).collect();
        let dist = analyzer.analyze(&values).unwrap();
        let sum: f64 = dist.digits.iter().map(|d| d.observed).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(dist.mad.is_finite());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(BenfordAnalyzer::new(BenfordConfig::new(0.0)).is_err());
    }
}
