//! Sampling compiler: black-box pseudo-Boolean function → QUBO.
//!
//! The function is evaluated once per subset of at most two variables
//! (see [`crate::sampling`]). Möbius inversion truncated to degree two then
//! recovers one coefficient per subset, in canonical order:
//!
//! - `c(∅) = f(∅)`
//! - `c({i}) = f({i}) - c(∅)`
//! - `c({i, j}) = f({i, j}) - c({i}) - c({j}) - c(∅)`
//!
//! The result reproduces `f` exactly only when `f` has no terms of degree
//! three or more; use [`crate::verify::FidelityVerifier`] to check.
//!
//! # Example
//!
//! ```
//! use qubify::compiler::SamplingCompiler;
//!
//! let f = |x: &[u8]| {
//!     let (a, b) = (f64::from(x[0]), f64::from(x[1]));
//!     1.0 + 2.0 * a + 3.0 * b + 4.0 * a * b
//! };
//!
//! let compiler = SamplingCompiler::new();
//! assert_eq!(compiler.coefficients(&f, 2).into_vec(), vec![1.0, 2.0, 3.0, 4.0]);
//!
//! let q = compiler.compile_numeric(&f, 2).unwrap();
//! assert_eq!(q.matrix().as_slice(), &[2.0, 4.0, 0.0, 3.0]);
//! assert_eq!(*q.offset(), 1.0);
//! ```

mod assembler;
mod evaluation;

pub use assembler::assemble;
pub use evaluation::{EvaluationMode, EvaluationReport};

use crate::config::CompilerConfig;
use crate::error::{QubifyError, Result};
use crate::penalty::{combine, PenaltyWeight, PenalizedQubo};
use crate::qubo::{CompiledQubo, Qubo};
use crate::sampling::{indices, subset_count, SubsetIndex};
use crate::scalar::Scalar;
use crate::search_space::SearchSpace;
use crate::verify::FidelityVerifier;
use evaluation::Evaluator;
use std::convert::Infallible;
use std::ops::Index;

/// Coefficient table aligned with the canonical subset order.
///
/// Entry 0 is the constant, entries `1..=n` the linear terms, the rest the
/// pairwise terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients<T> {
    n: usize,
    values: Vec<T>,
}

impl<T: Scalar> Coefficients<T> {
    /// Wrap a precomputed table.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if the length is not
    /// `1 + n + n(n-1)/2`.
    pub fn from_values(n: usize, values: Vec<T>) -> Result<Self> {
        let expected = subset_count(n);
        if values.len() != expected {
            return Err(QubifyError::dimension_mismatch(
                "coefficient table length",
                expected,
                values.len(),
            ));
        }
        Ok(Self { n, values })
    }

    /// Number of binary variables.
    #[must_use]
    pub fn input_size(&self) -> usize {
        self.n
    }

    /// Number of coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coefficients as a slice in canonical order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Consume into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    /// The constant term.
    #[must_use]
    pub fn constant(&self) -> &T {
        &self.values[0]
    }

    /// Coefficient of a subset, if it belongs to this table.
    #[must_use]
    pub fn get(&self, index: &SubsetIndex) -> Option<&T> {
        index.position(self.n).map(|k| &self.values[k])
    }

    /// Pairs of subset and coefficient in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SubsetIndex, &T)> + '_ {
        indices(self.n).zip(self.values.iter())
    }

    /// Scatter into a form of the same entry type, without coercion.
    #[must_use]
    pub fn to_qubo(&self) -> Qubo<T> {
        assembler::scatter(self.n, self.values.iter().cloned())
    }
}

impl<T> Index<usize> for Coefficients<T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.values[position]
    }
}

/// Coefficients together with how they were evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    /// The coefficient table.
    pub coefficients: Coefficients<T>,
    /// Evaluation summary.
    pub report: EvaluationReport,
}

/// Apply the truncated Möbius recurrence to outputs in canonical order.
fn invert<T: Scalar>(n: usize, outputs: Vec<(SubsetIndex, T)>) -> Coefficients<T> {
    let mut values: Vec<T> = Vec::with_capacity(outputs.len());
    for (index, output) in outputs {
        debug_assert_eq!(index.position(n), Some(values.len()));
        let coefficient = match index {
            SubsetIndex::Empty => output,
            SubsetIndex::Single(_) => output - values[0].clone(),
            SubsetIndex::Pair(i, j) => {
                output - values[1 + i].clone() - values[1 + j].clone() - values[0].clone()
            }
        };
        values.push(coefficient);
    }
    Coefficients { n, values }
}

/// Compiles pseudo-Boolean functions into quadratic forms by sampling.
#[derive(Debug, Clone, Default)]
pub struct SamplingCompiler {
    config: CompilerConfig,
}

impl SamplingCompiler {
    /// Compiler with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiler using `config`.
    ///
    /// # Errors
    ///
    /// Returns the error of [`CompilerConfig::validate`].
    pub fn from_config(config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Enable or disable the worker pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config = self.config.with_parallel(parallel);
        self
    }

    /// Set the worker pool size.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config = self.config.with_workers(workers);
        self
    }

    /// Set random seed for reproducible verification.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    /// Set the penalty weight for [`SamplingCompiler::compile_constrained`].
    #[must_use]
    pub fn with_penalty(mut self, penalty: impl Into<PenaltyWeight>) -> Self {
        self.config = self.config.with_penalty(penalty);
        self
    }

    /// Verifier sharing this compiler's sample count, tolerance and seed.
    #[must_use]
    pub fn verifier(&self) -> FidelityVerifier {
        FidelityVerifier::from_config(&self.config)
    }

    /// Evaluate a fallible `f` on the training set and invert.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`, unchanged.
    pub fn try_extract<T, E, F>(&self, f: &F, n: usize) -> std::result::Result<Extraction<T>, E>
    where
        T: Scalar,
        E: Send,
        F: Fn(&[u8]) -> std::result::Result<T, E> + Sync,
    {
        tracing::debug!(input_size = n, samples = subset_count(n), "extracting coefficients");
        let (outputs, report) = Evaluator::from_config(&self.config).evaluate(f, n)?;
        let coefficients = invert(n, outputs);
        tracing::debug!(input_size = n, mode = ?report.mode, fell_back = report.fell_back, "extracted coefficients");
        Ok(Extraction {
            coefficients,
            report,
        })
    }

    /// Coefficient table of an infallible `f`.
    #[must_use]
    pub fn coefficients<T, F>(&self, f: &F, n: usize) -> Coefficients<T>
    where
        T: Scalar,
        F: Fn(&[u8]) -> T + Sync,
    {
        let infallible = |x: &[u8]| Ok::<T, Infallible>(f(x));
        match self.try_extract(&infallible, n) {
            Ok(extraction) => extraction.coefficients,
            Err(never) => match never {},
        }
    }

    /// Coefficient table of a fallible `f`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`, unchanged.
    pub fn try_coefficients<T, E, F>(&self, f: &F, n: usize) -> std::result::Result<Coefficients<T>, E>
    where
        T: Scalar,
        E: Send,
        F: Fn(&[u8]) -> std::result::Result<T, E> + Sync,
    {
        self.try_extract(f, n).map(|extraction| extraction.coefficients)
    }

    /// Compile an infallible `f` over `n` variables.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::Coercion`] if a coefficient is neither numeric
    /// nor symbolic.
    pub fn compile<T, F>(&self, f: &F, n: usize) -> Result<CompiledQubo>
    where
        T: Scalar,
        F: Fn(&[u8]) -> T + Sync,
    {
        assemble(&self.coefficients(f, n))
    }

    /// Compile a fallible `f` over `n` variables.
    ///
    /// # Errors
    ///
    /// Returns the converted error of `f`, or [`QubifyError::Coercion`].
    pub fn try_compile<T, E, F>(&self, f: &F, n: usize) -> Result<CompiledQubo>
    where
        T: Scalar,
        E: Into<QubifyError> + Send,
        F: Fn(&[u8]) -> std::result::Result<T, E> + Sync,
    {
        let coefficients = self.try_coefficients(f, n).map_err(Into::into)?;
        assemble(&coefficients)
    }

    /// Compile a real-valued `f` straight to a numeric form.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::Coercion`] if `f` produced a non-finite value.
    pub fn compile_numeric<F>(&self, f: &F, n: usize) -> Result<Qubo<f64>>
    where
        F: Fn(&[u8]) -> f64 + Sync,
    {
        self.compile(f, n)?.into_numeric("compile_numeric")
    }

    /// Compile a function of typed variables described by `space`.
    ///
    /// # Errors
    ///
    /// Returns decoding errors of the search space, or
    /// [`QubifyError::Coercion`].
    pub fn compile_in<T, F>(&self, space: &SearchSpace, f: &F) -> Result<CompiledQubo>
    where
        T: Scalar,
        F: Fn(&[u64]) -> T + Sync,
    {
        self.try_compile(&space.wrap(f), space.size())
    }

    /// Compile a cost and a constraint-violation function and merge them
    /// with the configured penalty weight.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::Coercion`] for non-finite outputs, or the
    /// errors of [`combine`].
    pub fn compile_constrained<F, G>(&self, cost: &F, constraint: &G, n: usize) -> Result<PenalizedQubo>
    where
        F: Fn(&[u8]) -> f64 + Sync,
        G: Fn(&[u8]) -> f64 + Sync,
    {
        let cost = self.compile_numeric(cost, n)?;
        let constraint = self.compile_numeric(constraint, n)?;
        combine(&cost, &constraint, self.config.penalty)
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
