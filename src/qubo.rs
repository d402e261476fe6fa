//! Quadratic forms `xᵀQx + c` over binary vectors.
//!
//! [`Qubo`] is generic over the entry type. The compiler returns a
//! [`CompiledQubo`], which is numeric whenever every coefficient coerced to
//! a finite number and symbolic otherwise; the choice is made once, when the
//! form is assembled.

use crate::error::{QubifyError, Result};
use crate::primitives::Matrix;
use crate::scalar::{Expr, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Square matrix `Q` plus scalar offset `c`.
///
/// Only the diagonal and the strict upper triangle are populated by the
/// compiler; the lower triangle stays at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQubo<T>")]
pub struct Qubo<T> {
    matrix: Matrix<T>,
    offset: T,
}

/// Unchecked wire form, validated through [`Qubo::new`].
#[derive(Deserialize)]
struct RawQubo<T> {
    matrix: Matrix<T>,
    offset: T,
}

impl<T> TryFrom<RawQubo<T>> for Qubo<T> {
    type Error = QubifyError;

    fn try_from(raw: RawQubo<T>) -> Result<Self> {
        Self::new(raw.matrix, raw.offset)
    }
}

impl<T> Qubo<T> {
    /// Build from a square matrix and an offset.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if the matrix is not square.
    pub fn new(matrix: Matrix<T>, offset: T) -> Result<Self> {
        if !matrix.is_square() {
            let (rows, cols) = matrix.shape();
            return Err(QubifyError::DimensionMismatch {
                expected: format!("square matrix ({rows}x{rows})"),
                actual: format!("{rows}x{cols}"),
            });
        }
        Ok(Self { matrix, offset })
    }
}

impl<T: Scalar> Qubo<T> {

    /// All-zero form over `n` variables.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            matrix: Matrix::filled(n, n, T::zero()),
            offset: T::zero(),
        }
    }

    /// Number of binary variables.
    #[must_use]
    pub fn size(&self) -> usize {
        self.matrix.n_rows()
    }

    /// The matrix `Q`.
    #[must_use]
    pub fn matrix(&self) -> &Matrix<T> {
        &self.matrix
    }

    /// The constant `c`.
    #[must_use]
    pub fn offset(&self) -> &T {
        &self.offset
    }

    /// Split into matrix and offset.
    #[must_use]
    pub fn into_parts(self) -> (Matrix<T>, T) {
        (self.matrix, self.offset)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: T) {
        self.matrix.set(row, col, value);
    }

    pub(crate) fn set_offset(&mut self, value: T) {
        self.offset = value;
    }
}

impl Qubo<f64> {
    /// Energy `xᵀQx + c` of a binary vector.
    ///
    /// Every matrix entry participates, so forms whose lower triangle was
    /// filled by hand evaluate correctly too.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if `x` has the wrong length.
    ///
    /// ```
    /// use qubify::primitives::Matrix;
    /// use qubify::qubo::Qubo;
    ///
    /// let q = Qubo::new(Matrix::from_vec(2, 2, vec![1.0, 3.0, 0.0, 4.0]).unwrap(), 0.0).unwrap();
    /// assert_eq!(q.energy(&[1, 1]).unwrap(), 8.0);
    /// ```
    pub fn energy(&self, x: &[u8]) -> Result<f64> {
        let n = self.size();
        if x.len() != n {
            return Err(QubifyError::dimension_mismatch("binary vector length", n, x.len()));
        }
        Ok(self.energy_unchecked(x))
    }

    /// Energy of a vector already known to have length `size()`.
    pub(crate) fn energy_unchecked(&self, x: &[u8]) -> f64 {
        let n = self.size();
        let mut total = self.offset;
        for i in (0..n).filter(|&i| x[i] != 0) {
            let row = self.matrix.row(i);
            total += (0..n).filter(|&j| x[j] != 0).map(|j| row[j]).sum::<f64>();
        }
        total
    }

    /// Non-zero entries keyed by `(row, col)`.
    ///
    /// This is the sparse layout external QUBO solvers consume; the offset
    /// is available separately through [`Qubo::offset`].
    #[must_use]
    pub fn to_sparse(&self) -> BTreeMap<(usize, usize), f64> {
        self.matrix
            .indexed_iter()
            .filter(|(_, v)| **v != 0.0)
            .map(|(ij, v)| (ij, *v))
            .collect()
    }

    /// Build from sparse `(row, col) → value` entries.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if an entry lies outside
    /// the `n × n` matrix.
    pub fn from_sparse(n: usize, entries: &BTreeMap<(usize, usize), f64>, offset: f64) -> Result<Self> {
        let mut qubo = Self::zeros(n);
        for (&(i, j), &value) in entries {
            if i >= n || j >= n {
                return Err(QubifyError::dimension_mismatch(
                    "sparse entry index",
                    n.saturating_sub(1),
                    i.max(j),
                ));
            }
            qubo.set(i, j, value);
        }
        qubo.set_offset(offset);
        Ok(qubo)
    }
}

/// Result of assembling a coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompiledQubo {
    /// Every coefficient coerced to a finite number.
    Numeric(Qubo<f64>),
    /// At least one coefficient still contains placeholders.
    Symbolic(Qubo<Expr>),
}

impl CompiledQubo {
    /// Number of binary variables.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Numeric(q) => q.size(),
            Self::Symbolic(q) => q.size(),
        }
    }

    /// True for the symbolic variant.
    #[must_use]
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }

    /// Borrow the numeric form, if this is one.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&Qubo<f64>> {
        match self {
            Self::Numeric(q) => Some(q),
            Self::Symbolic(_) => None,
        }
    }

    /// Borrow the symbolic form, if this is one.
    #[must_use]
    pub fn as_symbolic(&self) -> Option<&Qubo<Expr>> {
        match self {
            Self::Symbolic(q) => Some(q),
            Self::Numeric(_) => None,
        }
    }

    /// Take the numeric form, failing for symbolic ones.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::SymbolicUnsupported`] naming `operation`.
    pub fn into_numeric(self, operation: &str) -> Result<Qubo<f64>> {
        match self {
            Self::Numeric(q) => Ok(q),
            Self::Symbolic(_) => Err(QubifyError::SymbolicUnsupported {
                operation: operation.to_string(),
            }),
        }
    }

    /// Lift into the symbolic representation regardless of variant.
    #[must_use]
    pub fn into_symbolic(self) -> Qubo<Expr> {
        match self {
            Self::Symbolic(q) => q,
            Self::Numeric(q) => {
                let (matrix, offset) = q.into_parts();
                Qubo {
                    matrix: matrix.map(|v| v.to_expr()),
                    offset: offset.to_expr(),
                }
            }
        }
    }
}
