//! Analyzer configuration types.

use audit_spi::{AuditError, Result};
use serde::{Deserialize, Serialize};

/// MAD above which a digit distribution is treated as high risk.
pub const DEFAULT_MAD_RISK_THRESHOLD: f64 = 0.05;

/// Fraction of rows expected to be anomalous.
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Seed for the isolation forest, fixed so repeated runs label identically.
pub const DEFAULT_SEED: u64 = 42;

pub const DEFAULT_TREES: usize = 100;

/// Upper bound on the subsample drawn for each tree.
pub const DEFAULT_MAX_SAMPLES: usize = 256;

/// Fewest rows the isolation forest accepts.
pub const DEFAULT_MIN_SAMPLES: usize = 8;

// ============================================================================
// Zero Policy
// ============================================================================

/// How zero amounts are treated by the monetary pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// A zero amount is "no transaction": drop the row before both analyses.
    #[default]
    Exclude,
    /// A zero amount is a real transaction: keep it for outlier isolation.
    /// It still has no leading digit and never enters the digit distribution.
    Retain,
}

impl std::str::FromStr for ZeroPolicy {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exclude" => Ok(ZeroPolicy::Exclude),
            "retain" => Ok(ZeroPolicy::Retain),
            other => Err(AuditError::invalid_parameter(
                "zero_policy",
                format!("unknown policy '{}', expected exclude or retain", other),
            )),
        }
    }
}

// ============================================================================
// Benford Configuration
// ============================================================================

/// Digit distribution analyzer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenfordConfig {
    /// MAD threshold for the risk verdict (default: 0.05).
    pub risk_threshold: f64,
    /// Fewest values with a leading digit needed to report a distribution.
    pub min_values: usize,
}

impl Default for BenfordConfig {
    fn default() -> Self {
        Self {
            risk_threshold: DEFAULT_MAD_RISK_THRESHOLD,
            min_values: 1,
        }
    }
}

impl BenfordConfig {
    pub fn new(risk_threshold: f64) -> Self {
        Self {
            risk_threshold,
            ..Self::default()
        }
    }

    pub fn with_min_values(mut self, min_values: usize) -> Self {
        self.min_values = min_values;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.risk_threshold.is_finite() || self.risk_threshold <= 0.0 {
            return Err(AuditError::invalid_parameter(
                "risk_threshold",
                "must be a positive finite number",
            ));
        }
        if self.min_values == 0 {
            return Err(AuditError::invalid_parameter("min_values", "must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Isolation Forest Configuration
// ============================================================================

/// How the labelling threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contamination {
    /// Fixed score threshold of 0.5.
    Auto,
    /// Fraction of the population labelled anomalous, in (0, 0.5].
    Fraction(f64),
}

impl Default for Contamination {
    fn default() -> Self {
        Contamination::Fraction(DEFAULT_CONTAMINATION)
    }
}

impl Contamination {
    pub fn validate(&self) -> Result<()> {
        if let Contamination::Fraction(f) = *self {
            if !(f > 0.0 && f <= 0.5) {
                return Err(AuditError::invalid_parameter(
                    "contamination",
                    "must be in (0, 0.5]",
                ));
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Contamination {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Contamination::Auto);
        }
        let fraction: f64 = s.trim().parse().map_err(|_| {
            AuditError::invalid_parameter("contamination", format!("not a number: '{}'", s))
        })?;
        let contamination = Contamination::Fraction(fraction);
        contamination.validate()?;
        Ok(contamination)
    }
}

/// Isolation forest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Number of isolation trees (default: 100).
    pub n_trees: usize,
    /// Subsample size per tree, capped at the row count (default: 256).
    pub max_samples: usize,
    pub contamination: Contamination,
    /// RNG seed (default: 42).
    pub seed: u64,
    /// Fewest rows accepted by `fit` (default: 8).
    pub min_samples: usize,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: Contamination::default(),
            seed: DEFAULT_SEED,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl IsolationForestConfig {
    pub fn new(contamination: f64) -> Self {
        Self {
            contamination: Contamination::Fraction(contamination),
            ..Self::default()
        }
    }

    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_contamination(mut self, contamination: Contamination) -> Self {
        self.contamination = contamination;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(AuditError::invalid_parameter("n_trees", "must be at least 1"));
        }
        if self.max_samples < 2 {
            return Err(AuditError::invalid_parameter("max_samples", "must be at least 2"));
        }
        if self.min_samples < 2 {
            return Err(AuditError::invalid_parameter("min_samples", "must be at least 2"));
        }
        self.contamination.validate()
    }
}

// ============================================================================
// Audit Configuration
// ============================================================================

/// Configuration for a full audit run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub benford: BenfordConfig,
    pub isolation: IsolationForestConfig,
    pub zero_policy: ZeroPolicy,
}

impl AuditConfig {
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::new()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AuditError::InvalidInput(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.benford.validate()?;
        self.isolation.validate()
    }
}

/// Builder for AuditConfig.
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    config: AuditConfig,
}

impl AuditConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn risk_threshold(mut self, threshold: f64) -> Self {
        self.config.benford.risk_threshold = threshold;
        self
    }

    pub fn contamination(mut self, contamination: Contamination) -> Self {
        self.config.isolation.contamination = contamination;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.isolation.seed = seed;
        self
    }

    pub fn trees(mut self, n_trees: usize) -> Self {
        self.config.isolation.n_trees = n_trees;
        self
    }

    pub fn max_samples(mut self, max_samples: usize) -> Self {
        self.config.isolation.max_samples = max_samples;
        self
    }

    pub fn zero_policy(mut self, policy: ZeroPolicy) -> Self {
        self.config.zero_policy = policy;
        self
    }

    /// Build the configuration, validating every field.
    pub fn build(self) -> Result<AuditConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
