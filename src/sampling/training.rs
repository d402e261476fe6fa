//! Deterministic training samples, one per enumerated subset.

use super::indices::{indices, SubsetIndex};

/// Binary vector of length `n` with ones exactly at the subset's positions.
///
/// # Panics
///
/// Panics if the subset references a position `>= n`.
#[must_use]
pub fn training_sample(n: usize, index: &SubsetIndex) -> Vec<u8> {
    let mut sample = vec![0u8; n];
    for i in index.positions() {
        sample[i] = 1;
    }
    sample
}

/// All training samples for `n` variables in canonical order, each paired
/// with the subset it was built from.
pub fn training_samples(n: usize) -> impl ExactSizeIterator<Item = (SubsetIndex, Vec<u8>)> {
    indices(n).map(move |index| {
        let sample = training_sample(n, &index);
        (index, sample)
    })
}
