//! Coefficient ring for extracted quadratic forms.
//!
//! The coefficient recurrence only needs addition and subtraction, so any
//! type implementing [`Scalar`] can flow through extraction: plain numbers,
//! and [`Expr`] for functions whose outputs contain named placeholders.
//!
//! Whether a value is usable as a number is decided by [`Scalar::coerce`]:
//!
//! ```
//! use qubify::scalar::{Coercion, Expr, Scalar};
//!
//! assert_eq!(3_i64.coerce(), Coercion::Numeric(3.0));
//! assert_eq!(Expr::symbol("w").coerce(), Coercion::Symbolic);
//! assert!(matches!(f64::NAN.coerce(), Coercion::Invalid(_)));
//! ```

mod expr;

pub use expr::Expr;

use std::fmt::Debug;
use std::ops::{Add, Neg, Sub};

/// Outcome of trying to view a coefficient as a plain number.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// Finite numeric value.
    Numeric(f64),
    /// Value still contains free placeholders.
    Symbolic,
    /// Value can be represented neither way.
    Invalid(String),
}

/// Value type produced by a pseudo-Boolean function.
pub trait Scalar:
    Clone + Debug + Send + Sync + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Try to view this value as a finite number.
    fn coerce(&self) -> Coercion;

    /// Lift this value into the symbolic representation.
    fn to_expr(&self) -> Expr;
}

fn coerce_float(value: f64) -> Coercion {
    if value.is_finite() {
        Coercion::Numeric(value)
    } else {
        Coercion::Invalid(format!("non-finite value {value}"))
    }
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            fn zero() -> Self {
                0.0
            }

            fn coerce(&self) -> Coercion {
                coerce_float(f64::from(*self))
            }

            fn to_expr(&self) -> Expr {
                Expr::constant(f64::from(*self))
            }
        }
    )*};
}

macro_rules! impl_int_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            fn zero() -> Self {
                0
            }

            #[allow(clippy::cast_precision_loss)]
            fn coerce(&self) -> Coercion {
                Coercion::Numeric(*self as f64)
            }

            #[allow(clippy::cast_precision_loss)]
            fn to_expr(&self) -> Expr {
                Expr::constant(*self as f64)
            }
        }
    )*};
}

impl_float_scalar!(f32, f64);
impl_int_scalar!(i32, i64);

impl Scalar for Expr {
    fn zero() -> Self {
        Expr::default()
    }

    fn coerce(&self) -> Coercion {
        if self.is_constant() {
            coerce_float(self.constant_term())
        } else if !self.constant_term().is_finite() {
            Coercion::Invalid(format!(
                "non-finite constant term {}",
                self.constant_term()
            ))
        } else {
            Coercion::Symbolic
        }
    }

    fn to_expr(&self) -> Expr {
        self.clone()
    }
}
