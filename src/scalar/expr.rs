//! Linear expressions over named placeholders.

use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A linear combination of named placeholders plus a numeric constant.
///
/// Placeholders stand for values that are only known later (distances of
/// a routing instance, weights of a portfolio). Sampling a function that
/// returns `Expr` produces coefficients that are themselves expressions.
///
/// Terms whose coefficient becomes exactly zero are dropped, so `a - a`
/// collapses back to a constant.
///
/// # Examples
///
/// ```
/// use qubify::scalar::Expr;
///
/// let e = Expr::symbol("a") * 2.0 + Expr::symbol("b") - 1.0;
/// assert_eq!(e.coefficient("a"), 2.0);
/// assert_eq!(e.constant_term(), -1.0);
/// assert_eq!(e.free_symbols().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    constant: f64,
    terms: BTreeMap<String, f64>,
}

impl Expr {
    /// Expression with no placeholders.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self {
            constant: value,
            terms: BTreeMap::new(),
        }
    }

    /// A single placeholder with coefficient one.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(name.into(), 1.0);
        Self {
            constant: 0.0,
            terms,
        }
    }

    /// Matrix of placeholders named `s{row} {col}`.
    ///
    /// ```
    /// use qubify::scalar::Expr;
    ///
    /// let d = Expr::symbolic_matrix(2, 3);
    /// assert_eq!(d.get(1, 2), Expr::symbol("s1 2"));
    /// ```
    #[must_use]
    pub fn symbolic_matrix(rows: usize, cols: usize) -> Matrix<Expr> {
        let mut matrix = Matrix::filled(rows, cols, Expr::default());
        for i in 0..rows {
            for j in 0..cols {
                matrix.set(i, j, Expr::symbol(format!("s{i} {j}")));
            }
        }
        matrix
    }

    /// True when no placeholders remain.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// The numeric part of the expression.
    #[must_use]
    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    /// Coefficient of placeholder `name`, zero when absent.
    #[must_use]
    pub fn coefficient(&self, name: &str) -> f64 {
        self.terms.get(name).copied().unwrap_or(0.0)
    }

    /// Placeholder names in sorted order.
    pub fn free_symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }

    fn combine(mut self, other: &Expr, sign: f64) -> Self {
        self.constant += sign * other.constant;
        for (name, coeff) in &other.terms {
            let entry = self.terms.entry(name.clone()).or_insert(0.0);
            *entry += sign * coeff;
            if *entry == 0.0 {
                self.terms.remove(name);
            }
        }
        self
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        self.combine(&rhs, 1.0)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self.combine(&rhs, -1.0)
    }
}

impl Add<f64> for Expr {
    type Output = Expr;

    fn add(mut self, rhs: f64) -> Expr {
        self.constant += rhs;
        self
    }
}

impl Sub<f64> for Expr {
    type Output = Expr;

    fn sub(mut self, rhs: f64) -> Expr {
        self.constant -= rhs;
        self
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self * -1.0
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(mut self, rhs: f64) -> Expr {
        if rhs == 0.0 {
            return Expr::default();
        }
        self.constant *= rhs;
        for coeff in self.terms.values_mut() {
            *coeff *= rhs;
        }
        self
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        rhs * self
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::constant(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.constant);
        }
        let mut first = true;
        for (name, coeff) in &self.terms {
            let sign = if *coeff < 0.0 { "-" } else { "+" };
            if first {
                if *coeff < 0.0 {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            let magnitude = coeff.abs();
            if (magnitude - 1.0).abs() > f64::EPSILON {
                write!(f, "{magnitude}*")?;
            }
            write!(f, "{name}")?;
            first = false;
        }
        if self.constant != 0.0 {
            let sign = if self.constant < 0.0 { "-" } else { "+" };
            write!(f, " {sign} {}", self.constant.abs())?;
        }
        Ok(())
    }
}
