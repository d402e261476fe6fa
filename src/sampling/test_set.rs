//! Random held-out samples of Hamming weight ≥ 3.

use super::indices::subset_count;
use rand::prelude::*;
use std::collections::HashSet;

/// Number of ones in a binary vector.
#[must_use]
pub fn hamming_weight(x: &[u8]) -> usize {
    x.iter().filter(|&&b| b != 0).count()
}

/// Number of binary vectors of length `n` that are not training samples:
/// `2^n - (1 + n + n(n-1)/2)`, saturating at `usize::MAX`.
///
/// ```
/// use qubify::sampling::max_test_samples;
///
/// assert_eq!(max_test_samples(2), 0);
/// assert_eq!(max_test_samples(3), 1);
/// assert_eq!(max_test_samples(4), 5);
/// ```
#[must_use]
pub fn max_test_samples(n: usize) -> usize {
    match u32::try_from(n).ok().and_then(|s| 1usize.checked_shl(s)) {
        Some(total) => total.saturating_sub(subset_count(n)),
        None => usize::MAX,
    }
}

/// A duplicate-free set of random binary vectors, each of weight ≥ 3.
///
/// Generated per verification call and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSamples {
    samples: Vec<Vec<u8>>,
    requested: usize,
    clamped: bool,
}

impl TestSamples {
    /// Draw `requested` distinct vectors of length `n` from `rng`.
    ///
    /// When more vectors are requested than exist, the count is clamped to
    /// [`max_test_samples`] and a warning is logged.
    pub fn generate<R: Rng>(n: usize, requested: usize, rng: &mut R) -> Self {
        let available = max_test_samples(n);
        let clamped = requested > available;
        let count = if clamped {
            tracing::warn!(
                requested,
                available,
                input_size = n,
                "requested more test samples than exist, clamping"
            );
            available
        } else {
            requested
        };

        let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(count);
        let mut samples = Vec::with_capacity(count);
        while samples.len() < count {
            let candidate: Vec<u8> = (0..n).map(|_| u8::from(rng.gen::<bool>())).collect();
            // weight ≤ 2 is already covered by the training set
            if hamming_weight(&candidate) <= 2 {
                continue;
            }
            if seen.insert(candidate.clone()) {
                samples.push(candidate);
            }
        }

        Self {
            samples,
            requested,
            clamped,
        }
    }

    /// Draw with a fixed seed, or from the thread RNG when `seed` is `None`.
    #[must_use]
    pub fn draw(n: usize, requested: usize, seed: Option<u64>) -> Self {
        let mut rng: Box<dyn RngCore> = match seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(thread_rng()),
        };
        Self::generate(n, requested, &mut rng)
    }

    /// Number of samples actually drawn.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Count asked for before clamping.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Whether the request exceeded the number of available vectors.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    /// Iterate over the samples in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.samples.iter().map(Vec::as_slice)
    }

    /// Consume into the sample vectors.
    #[must_use]
    pub fn into_vec(self) -> Vec<Vec<u8>> {
        self.samples
    }
}
