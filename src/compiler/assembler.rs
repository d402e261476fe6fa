//! Scatter a coefficient table into a quadratic form.

use super::Coefficients;
use crate::error::{QubifyError, Result};
use crate::qubo::{CompiledQubo, Qubo};
use crate::sampling::{indices, SubsetIndex};
use crate::scalar::{Coercion, Scalar};

/// Build `(Q, c)` from coefficients, choosing the numeric representation
/// when every coefficient coerces to a finite number and the symbolic one
/// when any coefficient still has placeholders.
///
/// # Errors
///
/// Returns [`QubifyError::Coercion`] for a coefficient that is neither
/// numeric nor symbolic.
///
/// ```
/// use qubify::compiler::{assemble, Coefficients};
///
/// let coefficients = Coefficients::from_values(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let q = assemble(&coefficients).unwrap().into_numeric("test").unwrap();
/// assert_eq!(q.matrix().as_slice(), &[2.0, 4.0, 0.0, 3.0]);
/// assert_eq!(*q.offset(), 1.0);
/// ```
pub fn assemble<T: Scalar>(coefficients: &Coefficients<T>) -> Result<CompiledQubo> {
    let mut numeric = Vec::with_capacity(coefficients.len());
    let mut symbolic = false;
    for (position, value) in coefficients.as_slice().iter().enumerate() {
        match value.coerce() {
            Coercion::Numeric(v) => numeric.push(v),
            Coercion::Symbolic => symbolic = true,
            Coercion::Invalid(reason) => return Err(QubifyError::Coercion { position, reason }),
        }
    }

    let n = coefficients.input_size();
    if symbolic {
        let values = coefficients.as_slice().iter().map(T::to_expr);
        Ok(CompiledQubo::Symbolic(scatter(n, values)))
    } else {
        Ok(CompiledQubo::Numeric(scatter(n, numeric.into_iter())))
    }
}

/// Place values given in canonical subset order into a form over `n`
/// variables.
pub(crate) fn scatter<U, I>(n: usize, values: I) -> Qubo<U>
where
    U: Scalar,
    I: Iterator<Item = U>,
{
    let mut qubo = Qubo::zeros(n);
    for (index, value) in indices(n).zip(values) {
        match index {
            SubsetIndex::Empty => qubo.set_offset(value),
            SubsetIndex::Single(i) => qubo.set(i, i, value),
            SubsetIndex::Pair(i, j) => qubo.set(i, j, value),
        }
    }
    qubo
}
