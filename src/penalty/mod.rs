//! Penalty weights for merging a cost form with a constraint form.
//!
//! A constrained problem `min cost(x) s.t. violations(x) = 0` becomes the
//! unconstrained form `cost + w · violations`. The weight has to be large
//! enough that one unit of violation outweighs any possible improvement of
//! the cost. All estimators look at the cost matrix only and treat
//! violations as non-negative integers.
//!
//! # Methods
//!
//! - [`PenaltyMethod::Sum`]: sum of positive entries minus sum of negative
//!   entries, the largest possible swing of the cost.
//! - [`PenaltyMethod::PosNegForm`]: difference of the constants of the
//!   posiform and negaform of the cost (Boros, Hammer & Tavares 2006).
//! - [`PenaltyMethod::VermaLewis`]: largest per-variable bound
//!   (Verma & Lewis 2020).
//!
//! # Example
//!
//! ```
//! use qubify::penalty::{combine, PenaltyMethod, PenaltyWeight};
//! use qubify::primitives::Matrix;
//! use qubify::qubo::Qubo;
//!
//! let cost = Qubo::new(Matrix::from_vec(2, 2, vec![-1.0, 2.0, 0.0, -1.0]).unwrap(), 0.0).unwrap();
//! let constraint = Qubo::new(Matrix::from_vec(2, 2, vec![-1.0, 2.0, 0.0, -1.0]).unwrap(), 1.0).unwrap();
//!
//! let merged = combine(&cost, &constraint, PenaltyWeight::Method(PenaltyMethod::Sum)).unwrap();
//! assert_eq!(merged.weight, 4.0);
//! assert_eq!(merged.qubo.matrix().get(0, 1), 2.0 + 4.0 * 2.0);
//! ```

use crate::error::{QubifyError, Result};
use crate::qubo::Qubo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bound-estimation strategy for the penalty weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PenaltyMethod {
    /// Sum of entry magnitudes.
    Sum,
    /// Posiform/negaform constant difference.
    PosNegForm,
    /// Row-local Verma–Lewis bound.
    VermaLewis,
}

impl PenaltyMethod {
    /// Every supported method.
    pub const ALL: [PenaltyMethod; 3] = [Self::Sum, Self::PosNegForm, Self::VermaLewis];

    /// Configuration name of the method.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::PosNegForm => "pnform",
            Self::VermaLewis => "verma_lewis",
        }
    }

    /// Estimate the weight for `cost`.
    #[must_use]
    pub fn weight(&self, cost: &Qubo<f64>) -> f64 {
        match self {
            Self::Sum => sum_penalty(cost),
            Self::PosNegForm => pos_neg_penalty(cost),
            Self::VermaLewis => verma_lewis_penalty(cost),
        }
    }
}

impl fmt::Display for PenaltyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PenaltyMethod {
    type Err = QubifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "pnform" | "pos_neg_form" => Ok(Self::PosNegForm),
            "verma_lewis" | "verma-lewis" => Ok(Self::VermaLewis),
            _ => Err(QubifyError::UnknownPenaltyMethod {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PenaltyMethod {
    type Error = QubifyError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PenaltyMethod> for String {
    fn from(method: PenaltyMethod) -> Self {
        method.name().to_string()
    }
}

/// How the penalty weight is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyWeight {
    /// Caller-supplied weight.
    Explicit(f64),
    /// Estimated from the cost matrix.
    Method(PenaltyMethod),
}

impl Default for PenaltyWeight {
    fn default() -> Self {
        Self::Method(PenaltyMethod::Sum)
    }
}

impl PenaltyWeight {
    /// Resolve to a number for `cost`.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::InvalidHyperparameter`] for an explicit weight
    /// that is negative or not finite.
    pub fn resolve(&self, cost: &Qubo<f64>) -> Result<f64> {
        match *self {
            Self::Explicit(w) if w.is_finite() && w >= 0.0 => Ok(w),
            Self::Explicit(w) => Err(QubifyError::InvalidHyperparameter {
                param: "penalty_weight".to_string(),
                value: w.to_string(),
                constraint: "finite and >= 0".to_string(),
            }),
            Self::Method(method) => Ok(method.weight(cost)),
        }
    }
}

impl From<PenaltyMethod> for PenaltyWeight {
    fn from(method: PenaltyMethod) -> Self {
        Self::Method(method)
    }
}

impl From<f64> for PenaltyWeight {
    fn from(weight: f64) -> Self {
        Self::Explicit(weight)
    }
}

/// Merged unconstrained form and the weight that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PenalizedQubo {
    /// `Q_cost + w · Q_constraint`, offset `c_cost + c_constraint`.
    pub qubo: Qubo<f64>,
    /// Weight `w` applied to the constraint matrix.
    pub weight: f64,
}

/// Merge a cost form and a constraint form into one unconstrained form.
///
/// # Errors
///
/// Returns [`QubifyError::DimensionMismatch`] if the forms have different
/// sizes, or the error of [`PenaltyWeight::resolve`].
pub fn combine(
    cost: &Qubo<f64>,
    constraint: &Qubo<f64>,
    weight: PenaltyWeight,
) -> Result<PenalizedQubo> {
    if cost.size() != constraint.size() {
        return Err(QubifyError::dimension_mismatch(
            "constraint size",
            cost.size(),
            constraint.size(),
        ));
    }
    let w = weight.resolve(cost)?;
    let matrix = cost
        .matrix()
        .add(&constraint.matrix().mul_scalar(w))
        .map_err(|msg| QubifyError::DimensionMismatch {
            expected: format!("{0}x{0}", cost.size()),
            actual: msg.to_string(),
        })?;
    let qubo = Qubo::new(matrix, cost.offset() + constraint.offset())?;
    tracing::debug!(weight = w, size = cost.size(), "merged cost and constraint forms");
    Ok(PenalizedQubo { qubo, weight: w })
}

/// Sum of positive entries minus sum of negative entries.
#[must_use]
pub fn sum_penalty(cost: &Qubo<f64>) -> f64 {
    let entries = cost.matrix().as_slice();
    let positive: f64 = entries.iter().filter(|&&v| v > 0.0).sum();
    let negative: f64 = entries.iter().filter(|&&v| v < 0.0).sum();
    positive - negative
}

/// Negaform constant minus posiform constant.
///
/// For column `j`, the posiform linear term is `c_jj` plus the negative
/// entries above the diagonal, the negaform term `c_jj` plus the positive
/// ones. The constants collect the negative posiform terms and the positive
/// negaform terms respectively.
#[must_use]
pub fn pos_neg_penalty(cost: &Qubo<f64>) -> f64 {
    let q = cost.matrix();
    let n = cost.size();
    let mut pos_c0 = 0.0;
    let mut neg_c0 = 0.0;
    for j in 0..n {
        let above = (0..j).map(|i| q[(i, j)]);
        let (neg_above, pos_above) = above.fold((0.0, 0.0), |(neg, pos), v| {
            if v < 0.0 {
                (neg + v, pos)
            } else if v > 0.0 {
                (neg, pos + v)
            } else {
                (neg, pos)
            }
        });
        let pos_cj = q[(j, j)] + neg_above;
        let neg_cj = q[(j, j)] + pos_above;
        if pos_cj < 0.0 {
            pos_c0 += pos_cj;
        }
        if neg_cj > 0.0 {
            neg_c0 += neg_cj;
        }
    }
    neg_c0 - pos_c0
}

/// Largest of `c_ii + Σ_{j>i, c_ij>0} c_ij` and `-c_ii - Σ_{j>i, c_ij<0} c_ij`
/// over all rows; zero for an empty form.
#[must_use]
pub fn verma_lewis_penalty(cost: &Qubo<f64>) -> f64 {
    let q = cost.matrix();
    let n = cost.size();
    (0..n)
        .flat_map(|i| {
            let right = &q.row(i)[i + 1..];
            let pos: f64 = right.iter().filter(|&&v| v > 0.0).sum();
            let neg: f64 = right.iter().filter(|&&v| v < 0.0).sum();
            let diag = q[(i, i)];
            [diag + pos, -diag - neg]
        })
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "penalty_tests.rs"]
mod tests;
