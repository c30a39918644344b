use std::collections::BTreeMap;

use fast_core::{FastError, RngHandle};
use fast_rank::select_top;

#[test]
fn distinct_rankings_select_in_order() {
    let states = [10, 11, 12, 13];
    let rankings = [0.4, 2.0, -1.0, 1.0];
    let mut rng = RngHandle::from_seed(3);
    assert_eq!(
        select_top(&states, &rankings, 3, true, &mut rng).unwrap(),
        vec![11, 13, 10]
    );
    assert_eq!(
        select_top(&states, &rankings, 2, false, &mut rng).unwrap(),
        vec![12, 10]
    );
}

#[test]
fn tied_states_are_selected_uniformly() {
    let states = [0, 1, 2, 3];
    let rankings = [1.0; 4];
    let mut rng = RngHandle::from_seed(2024);
    let trials = 20_000;
    let mut hits: BTreeMap<usize, usize> = BTreeMap::new();
    for _ in 0..trials {
        let pick = select_top(&states, &rankings, 1, true, &mut rng).unwrap();
        *hits.entry(pick[0]).or_default() += 1;
    }
    assert_eq!(hits.len(), 4);
    for count in hits.values() {
        let freq = *count as f64 / trials as f64;
        assert!((freq - 0.25).abs() < 0.02, "frequency {freq} not uniform");
    }
}

#[test]
fn ties_only_shuffle_within_their_rank() {
    let states = [0, 1, 2, 3, 4];
    let rankings = [5.0, 3.0, 3.0, 3.0, 1.0];
    let mut rng = RngHandle::from_seed(9);
    let trials = 9_000;
    let mut second: BTreeMap<usize, usize> = BTreeMap::new();
    for _ in 0..trials {
        let picks = select_top(&states, &rankings, 2, true, &mut rng).unwrap();
        assert_eq!(picks[0], 0);
        *second.entry(picks[1]).or_default() += 1;
    }
    assert_eq!(second.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    for count in second.values() {
        let freq = *count as f64 / trials as f64;
        assert!((freq - 1.0 / 3.0).abs() < 0.03, "frequency {freq} not uniform");
    }
}

#[test]
fn infinite_values_group_as_ties() {
    let states = [0, 1, 2];
    let rankings = [f64::INFINITY, 0.0, f64::INFINITY];
    let mut rng = RngHandle::from_seed(1);
    let picks = select_top(&states, &rankings, 2, false, &mut rng).unwrap();
    assert_eq!(picks[0], 1);
    assert!(picks[1] == 0 || picks[1] == 2);
}

#[test]
fn same_seed_same_selection() {
    let states: Vec<usize> = (0..50).collect();
    let rankings = vec![0.0; 50];
    let a = select_top(&states, &rankings, 10, true, &mut RngHandle::from_seed(5)).unwrap();
    let b = select_top(&states, &rankings, 10, true, &mut RngHandle::from_seed(5)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn nan_rankings_are_rejected() {
    let mut rng = RngHandle::from_seed(0);
    let err = select_top(&[0, 1], &[1.0, f64::NAN], 1, true, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "ineligible-ranking");
}

#[test]
fn oversized_batch_is_rejected() {
    let mut rng = RngHandle::from_seed(0);
    match select_top(&[0, 1], &[1.0, 2.0], 3, true, &mut rng).unwrap_err() {
        FastError::Validation(info) => assert_eq!(info.code, "insufficient-states"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn misaligned_inputs_are_rejected() {
    let mut rng = RngHandle::from_seed(0);
    let err = select_top(&[0, 1, 2], &[1.0, 2.0], 1, true, &mut rng).unwrap_err();
    assert!(matches!(err, FastError::Shape(_)));
}
