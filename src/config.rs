//! Compiler configuration.
//!
//! ```
//! use qubify::config::CompilerConfig;
//! use qubify::penalty::{PenaltyMethod, PenaltyWeight};
//!
//! let config = CompilerConfig::from_json(
//!     r#"{"workers": 2, "tolerance": 1e-6, "penalty": {"method": "pnform"}}"#,
//! )
//! .unwrap();
//! assert_eq!(config.workers, Some(2));
//! assert!(config.parallel);
//! assert_eq!(config.penalty, PenaltyWeight::Method(PenaltyMethod::PosNegForm));
//! ```

use crate::error::{QubifyError, Result};
use crate::penalty::PenaltyWeight;
use serde::{Deserialize, Serialize};

/// Default verification tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Settings shared by the compiler and the verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Evaluate training samples on a worker pool.
    pub parallel: bool,
    /// Pool size; hardware concurrency when unset.
    pub workers: Option<usize>,
    /// Number of verification samples; the input size when unset.
    pub test_samples: Option<usize>,
    /// Largest accepted residual during verification.
    pub tolerance: f64,
    /// Seed for verification sampling.
    pub seed: Option<u64>,
    /// Penalty weight used by constrained compilation.
    pub penalty: PenaltyWeight,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: None,
            test_samples: None,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
            penalty: PenaltyWeight::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::Serialization`] for malformed JSON (including
    /// unknown penalty methods) and the errors of [`CompilerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::InvalidHyperparameter`] for zero workers, a
    /// negative or non-finite tolerance, or an invalid explicit penalty.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(QubifyError::InvalidHyperparameter {
                param: "workers".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(QubifyError::InvalidHyperparameter {
                param: "tolerance".to_string(),
                value: self.tolerance.to_string(),
                constraint: "finite and >= 0".to_string(),
            });
        }
        if let PenaltyWeight::Explicit(w) = self.penalty {
            if !(w.is_finite() && w >= 0.0) {
                return Err(QubifyError::InvalidHyperparameter {
                    param: "penalty".to_string(),
                    value: w.to_string(),
                    constraint: "finite and >= 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Enable or disable the worker pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the pool size (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Set the number of verification samples.
    #[must_use]
    pub fn with_test_samples(mut self, count: usize) -> Self {
        self.test_samples = Some(count);
        self
    }

    /// Set the verification tolerance (negative values clamp to zero).
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Set random seed for reproducible verification.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the penalty weight for constrained compilation.
    #[must_use]
    pub fn with_penalty(mut self, penalty: impl Into<PenaltyWeight>) -> Self {
        self.penalty = penalty.into();
        self
    }
}
