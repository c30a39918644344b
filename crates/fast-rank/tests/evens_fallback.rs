use std::collections::BTreeMap;

use fast_core::RngHandle;
use fast_rank::select_evens;
use proptest::prelude::*;

fn tally(batch: &[usize]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for &state in batch {
        *counts.entry(state).or_insert(0) += 1;
    }
    counts
}

#[test]
fn exact_multiple_repeats_every_state() {
    let mut rng = RngHandle::from_seed(4);
    let batch = select_evens(&[3, 7, 9], 9, &mut rng).unwrap();
    assert_eq!(batch.len(), 9);
    assert!(tally(&batch).values().all(|&count| count == 3));
}

#[test]
fn remainder_uses_distinct_states() {
    let mut rng = RngHandle::from_seed(8);
    let states = [0, 1, 2, 3, 4];
    let batch = select_evens(&states, 8, &mut rng).unwrap();
    let counts = tally(&batch);
    assert_eq!(counts.len(), 5);
    assert_eq!(counts.values().filter(|&&c| c == 2).count(), 3);
    assert_eq!(counts.values().filter(|&&c| c == 1).count(), 2);
}

#[test]
fn fewer_clones_than_states_samples_without_replacement() {
    let mut rng = RngHandle::from_seed(12);
    let batch = select_evens(&[5, 6, 7, 8], 3, &mut rng).unwrap();
    assert_eq!(batch.len(), 3);
    assert!(tally(&batch).values().all(|&count| count == 1));
}

#[test]
fn empty_state_set_is_an_error() {
    let mut rng = RngHandle::from_seed(0);
    let err = select_evens(&[], 2, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "no-states");
    assert!(select_evens(&[], 0, &mut rng).unwrap().is_empty());
}

proptest! {
    #[test]
    fn batch_length_always_matches(seed in any::<u64>(), n_states in 1usize..12, n in 0usize..40) {
        let states: Vec<usize> = (0..n_states).map(|s| s * 3).collect();
        let mut rng = RngHandle::from_seed(seed);
        let batch = select_evens(&states, n, &mut rng).unwrap();
        prop_assert_eq!(batch.len(), n);
        prop_assert!(batch.iter().all(|state| states.contains(state)));
        let counts = tally(&batch);
        let floor = n / n_states;
        prop_assert!(counts.values().all(|&c| c == floor || c == floor + 1));
    }
}
