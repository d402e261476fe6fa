//! Training and test samples for the sampling compiler.
//!
//! # Training set
//!
//! Every subset of `{0, …, n-1}` with at most two elements is turned into
//! the binary vector that has ones exactly at the subset's positions. The
//! subsets are produced in a fixed canonical order (see [`indices`]) and
//! that order is the layout of the coefficient table.
//!
//! # Test set
//!
//! Random binary vectors of Hamming weight ≥ 3, which the training set never
//! contains. They are used only to check an extracted form, never to build
//! one.
//!
//! ```
//! use qubify::sampling::{indices, training_sample, SubsetIndex};
//!
//! let order: Vec<SubsetIndex> = indices(2).collect();
//! assert_eq!(
//!     order,
//!     vec![SubsetIndex::Empty, SubsetIndex::Single(0), SubsetIndex::Single(1), SubsetIndex::Pair(0, 1)]
//! );
//! assert_eq!(training_sample(3, &SubsetIndex::Pair(0, 2)), vec![1, 0, 1]);
//! ```

mod indices;
mod test_set;
mod training;

pub use indices::{indices, subset_count, IndexEnumerator, SubsetIndex};
pub use test_set::{hamming_weight, max_test_samples, TestSamples};
pub use training::{training_sample, training_samples};

#[cfg(test)]
mod tests;
