//! Empirical check that an extracted form reproduces its function.
//!
//! Training samples only ever have weight ≤ 2, so they cannot reveal terms
//! of degree three or more. The verifier evaluates both the function and
//! the form on fresh random vectors of weight ≥ 3 and compares them. A
//! pass raises confidence that the function is quadratic; it does not
//! prove it.
//!
//! ```
//! use qubify::compiler::SamplingCompiler;
//! use qubify::verify::FidelityVerifier;
//!
//! let cubic = |x: &[u8]| 1.0 + 3.0 * f64::from(x[1]) + f64::from(x[0] * x[1] * x[2]);
//! let q = SamplingCompiler::new().compile_numeric(&cubic, 3).unwrap();
//! assert!(!FidelityVerifier::default().verify(&cubic, &q));
//! ```

use crate::config::{CompilerConfig, DEFAULT_TOLERANCE};
use crate::error::Result;
use crate::qubo::{CompiledQubo, Qubo};
use crate::sampling::TestSamples;
use std::convert::Infallible;

/// One test vector on which form and function disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// The test vector.
    pub sample: Vec<u8>,
    /// Value of the function.
    pub expected: f64,
    /// Energy of the form.
    pub actual: f64,
}

impl Mismatch {
    /// Absolute difference between energy and function value.
    #[must_use]
    pub fn residual(&self) -> f64 {
        (self.actual - self.expected).abs()
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, PartialEq)]
pub struct FidelityReport {
    /// Number of vectors checked.
    pub samples_checked: usize,
    /// Number of vectors asked for.
    pub requested: usize,
    /// Whether the request was reduced to the number of available vectors.
    pub clamped: bool,
    /// Tolerance applied.
    pub tolerance: f64,
    /// Largest residual seen (zero when nothing was checked).
    pub max_residual: f64,
    /// Vectors whose residual exceeded the tolerance.
    pub mismatches: Vec<Mismatch>,
}

impl FidelityReport {
    /// True when every checked vector was within tolerance.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compares a function with its extracted form on random test vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FidelityVerifier {
    test_samples: Option<usize>,
    tolerance: f64,
    seed: Option<u64>,
}

impl Default for FidelityVerifier {
    fn default() -> Self {
        Self {
            test_samples: None,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
        }
    }
}

impl FidelityVerifier {
    /// Verifier using the sample count, tolerance and seed of `config`.
    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            test_samples: config.test_samples,
            tolerance: config.tolerance,
            seed: config.seed,
        }
    }

    /// Number of test vectors; defaults to the number of variables.
    #[must_use]
    pub fn with_test_samples(mut self, count: usize) -> Self {
        self.test_samples = Some(count);
        self
    }

    /// Largest accepted residual (negative values clamp to zero).
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Set random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// True when `qubo` matches `f` on every drawn test vector.
    pub fn verify<F>(&self, f: &F, qubo: &Qubo<f64>) -> bool
    where
        F: Fn(&[u8]) -> f64,
    {
        self.report(f, qubo).passed()
    }

    /// Like [`FidelityVerifier::verify`] for a compiled form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QubifyError::SymbolicUnsupported`] for symbolic forms.
    pub fn verify_compiled<F>(&self, f: &F, compiled: &CompiledQubo) -> Result<bool>
    where
        F: Fn(&[u8]) -> f64,
    {
        match compiled.as_numeric() {
            Some(qubo) => Ok(self.verify(f, qubo)),
            None => Err(crate::QubifyError::SymbolicUnsupported {
                operation: "verification".to_string(),
            }),
        }
    }

    /// Detailed comparison of `f` and `qubo`.
    pub fn report<F>(&self, f: &F, qubo: &Qubo<f64>) -> FidelityReport
    where
        F: Fn(&[u8]) -> f64,
    {
        let infallible = |x: &[u8]| Ok::<f64, Infallible>(f(x));
        match self.try_report(&infallible, qubo) {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }

    /// Detailed comparison with a fallible `f`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`, unchanged.
    pub fn try_report<F, E>(&self, f: &F, qubo: &Qubo<f64>) -> std::result::Result<FidelityReport, E>
    where
        F: Fn(&[u8]) -> std::result::Result<f64, E>,
    {
        let n = qubo.size();
        let requested = self.test_samples.unwrap_or(n);
        let samples = TestSamples::draw(n, requested, self.seed);

        let mut max_residual: f64 = 0.0;
        let mut mismatches = Vec::new();
        for x in samples.iter() {
            let expected = f(x)?;
            let actual = qubo.energy_unchecked(x);
            let residual = (actual - expected).abs();
            // NaN residuals count as failures
            if residual.is_nan() || residual > self.tolerance {
                tracing::debug!(?x, expected, actual, residual, "test sample outside tolerance");
                mismatches.push(Mismatch {
                    sample: x.to_vec(),
                    expected,
                    actual,
                });
            }
            if residual.is_nan() {
                max_residual = f64::NAN;
            } else if !max_residual.is_nan() {
                max_residual = max_residual.max(residual);
            }
        }

        Ok(FidelityReport {
            samples_checked: samples.len(),
            requested,
            clamped: samples.is_clamped(),
            tolerance: self.tolerance,
            max_residual,
            mismatches,
        })
    }
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
