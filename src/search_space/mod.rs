//! Typed decision variables laid out on a bit string.
//!
//! A [`SearchSpace`] is an ordered list of `(label, encoding, width)`
//! entries. Its size is the sum of the widths, and it converts between
//! labelled integer values and flat binary vectors. The compiler only ever
//! sees the binary function produced by [`SearchSpace::wrap`].
//!
//! ```
//! use qubify::search_space::{Binarization, SearchSpace};
//! use std::collections::BTreeMap;
//!
//! let space = SearchSpace::from_variables([
//!     ("a", Binarization::Uint, 3),
//!     ("b", Binarization::Uint, 3),
//! ])
//! .unwrap();
//! assert_eq!(space.size(), 6);
//! assert_eq!(space.decode(&[1, 1, 0, 0, 1, 1]).unwrap(), vec![3, 6]);
//!
//! let values = BTreeMap::from([("a".to_string(), 3), ("b".to_string(), 6)]);
//! assert_eq!(space.encode(&values).unwrap(), vec![1, 1, 0, 0, 1, 1]);
//! ```

mod binarization;

pub use binarization::Binarization;

use crate::error::{QubifyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Widest variable a `u64` value can hold.
pub const MAX_WIDTH: usize = 64;

/// One decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Unique label.
    pub label: String,
    /// How the value is laid out on its bits.
    pub encoding: Binarization,
    /// Number of bits.
    pub width: usize,
}

/// Ordered collection of decision variables.
///
/// Serialized as the list of variables; deserializing re-runs the checks of
/// [`SearchSpace::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Variable>", into = "Vec<Variable>")]
pub struct SearchSpace {
    variables: Vec<Variable>,
    size: usize,
}

impl SearchSpace {
    /// Empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(label, encoding, width)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::InvalidSearchSpace`] for duplicate labels or
    /// unsupported widths.
    pub fn from_variables<I, S>(description: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Binarization, usize)>,
        S: Into<String>,
    {
        let mut space = Self::new();
        for (label, encoding, width) in description {
            space.add(label, encoding, width)?;
        }
        Ok(space)
    }

    /// Append a variable.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::InvalidSearchSpace`] if the label is already
    /// used or the width is 0 or larger than [`MAX_WIDTH`].
    pub fn add(&mut self, label: impl Into<String>, encoding: Binarization, width: usize) -> Result<&mut Self> {
        let label = label.into();
        if self.variables.iter().any(|v| v.label == label) {
            return Err(QubifyError::invalid_search_space(format!("duplicate label '{label}'")));
        }
        if width == 0 || width > MAX_WIDTH {
            return Err(QubifyError::invalid_search_space(format!(
                "width of '{label}' must be in 1..={MAX_WIDTH}, got {width}"
            )));
        }
        self.size += width;
        self.variables.push(Variable {
            label,
            encoding,
            width,
        });
        Ok(self)
    }

    /// Total number of bits.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Variables in layout order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Encode labelled values into a binary vector.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::Encoding`] if a label has no value or a value
    /// does not fit its width.
    pub fn encode(&self, values: &impl ValueLookup) -> Result<Vec<u8>> {
        let mut bits = Vec::with_capacity(self.size);
        for var in &self.variables {
            let value = values.lookup(&var.label).ok_or_else(|| QubifyError::Encoding {
                label: var.label.clone(),
                reason: "no value supplied".to_string(),
            })?;
            let encoded = var.encoding.encode(value, var.width).map_err(|reason| QubifyError::Encoding {
                label: var.label.clone(),
                reason,
            })?;
            bits.extend(encoded);
        }
        Ok(bits)
    }

    /// Decode a binary vector into values in layout order.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if `bits` has the wrong length.
    pub fn decode(&self, bits: &[u8]) -> Result<Vec<u64>> {
        self.check_len(bits)?;
        let mut offset = 0;
        Ok(self
            .variables
            .iter()
            .map(|var| {
                let value = var.encoding.decode(&bits[offset..offset + var.width]);
                offset += var.width;
                value
            })
            .collect())
    }

    /// Decode a binary vector into values keyed by label.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if `bits` has the wrong length.
    pub fn decode_map(&self, bits: &[u8]) -> Result<BTreeMap<String, u64>> {
        let values = self.decode(bits)?;
        Ok(self
            .variables
            .iter()
            .map(|var| var.label.clone())
            .zip(values)
            .collect())
    }

    /// Call a typed function on a binary vector.
    ///
    /// # Errors
    ///
    /// Returns [`QubifyError::DimensionMismatch`] if `bits` has the wrong length.
    pub fn call<T, F>(&self, f: &F, bits: &[u8]) -> Result<T>
    where
        F: Fn(&[u64]) -> T + ?Sized,
    {
        let values = self.decode(bits)?;
        Ok(f(&values))
    }

    /// Turn a typed function into a function of binary vectors.
    pub fn wrap<'a, T, F>(&'a self, f: F) -> impl Fn(&[u8]) -> Result<T> + 'a
    where
        T: 'a,
        F: Fn(&[u64]) -> T + 'a,
    {
        move |bits: &[u8]| self.call(&f, bits)
    }

    fn check_len(&self, bits: &[u8]) -> Result<()> {
        if bits.len() == self.size {
            Ok(())
        } else {
            Err(QubifyError::dimension_mismatch("search space size", self.size, bits.len()))
        }
    }
}

impl TryFrom<Vec<Variable>> for SearchSpace {
    type Error = QubifyError;

    fn try_from(variables: Vec<Variable>) -> Result<Self> {
        Self::from_variables(variables.into_iter().map(|v| (v.label, v.encoding, v.width)))
    }
}

impl From<SearchSpace> for Vec<Variable> {
    fn from(space: SearchSpace) -> Self {
        space.variables
    }
}

/// Source of labelled values for [`SearchSpace::encode`].
pub trait ValueLookup {
    /// Value for `label`, if any.
    fn lookup(&self, label: &str) -> Option<u64>;
}

impl<S: BuildHasher> ValueLookup for HashMap<String, u64, S> {
    fn lookup(&self, label: &str) -> Option<u64> {
        self.get(label).copied()
    }
}

impl ValueLookup for BTreeMap<String, u64> {
    fn lookup(&self, label: &str) -> Option<u64> {
        self.get(label).copied()
    }
}

#[cfg(test)]
#[path = "search_space_tests.rs"]
mod tests;
