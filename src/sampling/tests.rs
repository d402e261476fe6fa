use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

#[test]
fn test_indices_small_sizes() {
    assert_eq!(indices(0).collect::<Vec<_>>(), vec![SubsetIndex::Empty]);
    assert_eq!(
        indices(1).collect::<Vec<_>>(),
        vec![SubsetIndex::Empty, SubsetIndex::Single(0)]
    );
    assert_eq!(
        indices(2).collect::<Vec<_>>(),
        vec![
            SubsetIndex::Empty,
            SubsetIndex::Single(0),
            SubsetIndex::Single(1),
            SubsetIndex::Pair(0, 1)
        ]
    );
}

#[test]
fn test_indices_pair_order_is_lexicographic() {
    let pairs: Vec<_> = indices(4)
        .filter(|idx| idx.len() == 2)
        .map(|idx| idx.positions().collect::<Vec<_>>())
        .collect();
    assert_eq!(
        pairs,
        vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 3],
            vec![1, 2],
            vec![1, 3],
            vec![2, 3]
        ]
    );
}

#[test]
fn test_indices_count_and_exact_size() {
    for n in 0..12 {
        let it = indices(n);
        assert_eq!(it.len(), subset_count(n));
        assert_eq!(it.count(), 1 + n + n * n.saturating_sub(1) / 2);
    }
}

#[test]
fn test_indices_restartable() {
    let first = indices(5);
    let again = first.clone();
    assert_eq!(first.collect::<Vec<_>>(), again.collect::<Vec<_>>());
    assert_eq!(indices(5).input_size(), 5);
}

#[test]
fn test_derived_order_matches_enumeration() {
    let listed: Vec<_> = indices(6).collect();
    let mut sorted = listed.clone();
    sorted.reverse();
    sorted.sort();
    assert_eq!(listed, sorted);
}

#[test]
fn test_position_inverts_enumeration() {
    for n in 0..9 {
        for (k, idx) in indices(n).enumerate() {
            assert_eq!(idx.position(n), Some(k), "subset {idx} for n={n}");
        }
    }
    assert_eq!(SubsetIndex::Single(3).position(3), None);
}

#[test]
fn test_subset_display() {
    assert_eq!(SubsetIndex::Empty.to_string(), "()");
    assert_eq!(SubsetIndex::Single(4).to_string(), "(4,)");
    assert_eq!(SubsetIndex::Pair(1, 3).to_string(), "(1, 3)");
}

#[test]
fn test_training_samples_layout() {
    let one: Vec<_> = training_samples(1).map(|(_, s)| s).collect();
    assert_eq!(one, vec![vec![0], vec![1]]);

    let two: Vec<_> = training_samples(2).map(|(_, s)| s).collect();
    assert_eq!(two, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
}

#[test]
fn test_training_samples_weight_matches_subset() {
    for (idx, sample) in training_samples(7) {
        assert_eq!(hamming_weight(&sample), idx.len());
        for i in idx.positions() {
            assert_eq!(sample[i], 1);
        }
    }
}

#[test]
fn test_max_test_samples() {
    assert_eq!(max_test_samples(0), 0);
    assert_eq!(max_test_samples(1), 0);
    assert_eq!(max_test_samples(3), 1);
    assert_eq!(max_test_samples(5), 32 - 16);
    assert_eq!(max_test_samples(200), usize::MAX);
}

#[test]
fn test_test_samples_are_distinct_and_heavy() {
    let mut rng = StdRng::seed_from_u64(7);
    let set = TestSamples::generate(8, 40, &mut rng);
    assert_eq!(set.len(), 40);
    assert!(!set.is_clamped());

    let unique: HashSet<&[u8]> = set.iter().collect();
    assert_eq!(unique.len(), 40);
    assert!(set.iter().all(|x| x.len() == 8 && hamming_weight(x) >= 3));
}

#[test]
fn test_test_samples_clamped_to_maximum() {
    let set = TestSamples::draw(4, 100, Some(3));
    assert!(set.is_clamped());
    assert_eq!(set.requested(), 100);
    assert_eq!(set.len(), max_test_samples(4));

    let unique: HashSet<Vec<u8>> = set.clone().into_vec().into_iter().collect();
    assert_eq!(unique.len(), 5);
    assert!(unique.iter().all(|x| hamming_weight(x) >= 3));
}

#[test]
fn test_test_samples_empty_when_nothing_available() {
    let set = TestSamples::draw(2, 2, Some(1));
    assert!(set.is_empty());
    assert!(set.is_clamped());
}

#[test]
fn test_test_samples_seed_reproducible() {
    let a = TestSamples::draw(10, 20, Some(99));
    let b = TestSamples::draw(10, 20, Some(99));
    assert_eq!(a, b);
}
