//! Isolation forest outlier detector.

use audit_api::{Contamination, IsolationForestConfig};
use audit_spi::{AuditError, Detection, OutlierDetector, OutlierLabel, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use super::tree::{average_path_length, IsolationTree};

/// Score threshold used by [`Contamination::Auto`].
pub const AUTO_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone)]
struct FittedForest {
    trees: Vec<IsolationTree>,
    /// Subsample size each tree was grown on.
    sample_size: usize,
    threshold: f64,
}

/// Isolation forest over a single numeric feature.
///
/// Points that random partitions separate after few splits get scores
/// close to 1. Fitting is deterministic for a given seed.
///
/// @algorithm IsolationForest
/// @category EnsembleDetector
/// @complexity O(t * psi * log psi) fit, O(t * log psi) per scored point
#[derive(Debug, Clone)]
pub struct IsolationForest {
    config: IsolationForestConfig,
    fitted: Option<FittedForest>,
}

impl IsolationForest {
    /// Create a detector, validating the configuration.
    pub fn new(config: IsolationForestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fitted: None,
        })
    }

    pub fn config(&self) -> &IsolationForestConfig {
        &self.config
    }

    /// Threshold chosen during fitting.
    pub fn threshold(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.threshold)
    }

    pub fn tree_count(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.trees.len())
    }

    fn check_training_data(&self, data: &[f64]) -> Result<()> {
        if data.len() < self.config.min_samples {
            warn!(
                rows = data.len(),
                required = self.config.min_samples,
                "too few rows for isolation forest"
            );
            return Err(AuditError::InsufficientData {
                required: self.config.min_samples,
                got: data.len(),
            });
        }
        check_finite(data)?;

        let first = data[0];
        if data.iter().all(|&v| v == first) {
            warn!(rows = data.len(), value = first, "column has zero variance");
            return Err(AuditError::ZeroVariance);
        }
        Ok(())
    }

    fn scores_with(fitted: &FittedForest, data: &[f64]) -> Vec<f64> {
        let normalizer = average_path_length(fitted.sample_size);
        let n_trees = fitted.trees.len() as f64;
        data.iter()
            .map(|&x| {
                let mean_path =
                    fitted.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / n_trees;
                2f64.powf(-mean_path / normalizer)
            })
            .collect()
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self {
            config: IsolationForestConfig::default(),
            fitted: None,
        }
    }
}

impl OutlierDetector for IsolationForest {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        self.check_training_data(data)?;

        let n = data.len();
        let sample_size = self.config.max_samples.min(n);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let trees: Vec<IsolationTree> = (0..self.config.n_trees)
            .map(|_| {
                let mut sample: Vec<f64> = rand::seq::index::sample(&mut rng, n, sample_size)
                    .into_iter()
                    .map(|i| data[i])
                    .collect();
                IsolationTree::grow(&mut sample, max_depth, &mut rng)
            })
            .collect();

        let mut fitted = FittedForest {
            trees,
            sample_size,
            threshold: AUTO_THRESHOLD,
        };
        if let Contamination::Fraction(fraction) = self.config.contamination {
            let scores = Self::scores_with(&fitted, data);
            fitted.threshold = quantile(&scores, 1.0 - fraction);
        }

        debug!(
            rows = n,
            trees = fitted.trees.len(),
            sample_size,
            max_depth,
            threshold = fitted.threshold,
            "isolation forest fitted"
        );
        self.fitted = Some(fitted);
        Ok(())
    }

    fn detect(&self, data: &[f64]) -> Result<Detection> {
        let fitted = self.fitted.as_ref().ok_or(AuditError::NotFitted)?;
        let scores = self.score(data)?;
        let labels = scores
            .iter()
            .map(|&s| {
                if s > fitted.threshold {
                    OutlierLabel::Anomalous
                } else {
                    OutlierLabel::Normal
                }
            })
            .collect();
        Ok(Detection {
            scores,
            labels,
            threshold: fitted.threshold,
        })
    }

    fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        let fitted = self.fitted.as_ref().ok_or(AuditError::NotFitted)?;
        check_finite(data)?;
        Ok(Self::scores_with(fitted, data))
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

fn check_finite(data: &[f64]) -> Result<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(pos) => Err(AuditError::InvalidInput(format!(
            "non-finite value at position {}",
            pos
        ))),
        None => Ok(()),
    }
}

/// Linearly interpolated quantile of `values` at `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Vec<f64> {
        vec![10.0, 11.0, 9.0, 10.0, 12.0, 11.0, 10.0, 9.0, 10.0, 10000.0]
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 5.0);
        assert_eq!(quantile(&values, 0.5), 3.0);
        assert!((quantile(&values, 0.9) - 4.6).abs() < 1e-12);
    }

    #[test]
    fn test_flags_single_extreme_value() {
        let mut forest = IsolationForest::new(IsolationForestConfig::new(0.1)).unwrap();
        let detection = forest.fit_detect(&ledger()).unwrap();

        let flagged: Vec<usize> = detection
            .labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_anomalous())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(flagged, vec![9]);
    }

    #[test]
    fn test_scores_in_unit_interval() {
        let mut forest = IsolationForest::default();
        forest.fit(&ledger()).unwrap();
        let scores = forest.score(&ledger()).unwrap();
        assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
        let max = scores.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(max, scores[9]);
    }

    #[test]
    fn test_same_seed_same_output() {
        let data: Vec<f64> = (0..300).map(|i| ((i * 37) % 101) as f64 + 1.0).collect();
        let mut a = IsolationForest::default();
        let mut b = IsolationForest::default();
        let da = a.fit_detect(&data).unwrap();
        let db = b.fit_detect(&data).unwrap();
        assert_eq!(da, db);
    }

    #[test]
    fn test_different_seed_still_flags_extreme() {
        let config = IsolationForestConfig::new(0.1).with_seed(1234);
        let mut forest = IsolationForest::new(config).unwrap();
        let detection = forest.fit_detect(&ledger()).unwrap();
        assert!(detection.labels[9].is_anomalous());
    }

    #[test]
    fn test_auto_contamination_threshold() {
        let config = IsolationForestConfig::default().with_contamination(Contamination::Auto);
        let mut forest = IsolationForest::new(config).unwrap();
        forest.fit(&ledger()).unwrap();
        assert_eq!(forest.threshold(), Some(AUTO_THRESHOLD));
    }

    #[test]
    fn test_too_few_rows() {
        let mut forest = IsolationForest::default();
        assert_eq!(
            forest.fit(&[1.0, 2.0, 3.0]).unwrap_err(),
            AuditError::InsufficientData { required: 8, got: 3 }
        );
        assert!(!forest.is_fitted());
    }

    #[test]
    fn test_zero_variance() {
        let mut forest = IsolationForest::default();
        assert_eq!(forest.fit(&[5.0; 20]).unwrap_err(), AuditError::ZeroVariance);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut forest = IsolationForest::default();
        let mut data = ledger();
        data[3] = f64::NAN;
        assert!(matches!(forest.fit(&data), Err(AuditError::InvalidInput(_))));
    }

    #[test]
    fn test_not_fitted() {
        let forest = IsolationForest::default();
        assert_eq!(forest.score(&[1.0]).unwrap_err(), AuditError::NotFitted);
        assert_eq!(forest.detect(&[1.0]).unwrap_err(), AuditError::NotFitted);
    }

    #[test]
    fn test_subsample_capped_by_max_samples() {
        let data: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
        let config = IsolationForestConfig::default().with_trees(10).with_max_samples(64);
        let mut forest = IsolationForest::new(config).unwrap();
        forest.fit(&data).unwrap();
        assert_eq!(forest.tree_count(), 10);
        assert_eq!(forest.fitted.as_ref().unwrap().sample_size, 64);
    }

    #[test]
    fn test_invalid_config() {
        assert!(IsolationForest::new(IsolationForestConfig::new(0.0)).is_err());
    }
}
