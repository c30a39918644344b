use fast_core::{discovered_states, FastError, Msm, MsmSnapshot, SparseMatrix};

#[test]
fn discovered_states_include_row_or_column_hits() {
    // state 1 only receives transitions, state 3 is untouched
    let counts =
        SparseMatrix::from_triplets(4, 4, &[(0, 0, 6.0), (0, 1, 4.0), (2, 1, 5.0)]).unwrap();
    let msm = Msm::from_counts(counts).unwrap();
    assert_eq!(discovered_states(&msm), vec![0, 1, 2]);
}

#[test]
fn explicit_zero_counts_do_not_discover() {
    let counts = SparseMatrix::from_triplets(3, 3, &[(0, 1, 1.0), (2, 2, 0.0)]).unwrap();
    let msm = Msm::from_counts(counts).unwrap();
    assert_eq!(discovered_states(&msm), vec![0, 1]);
}

#[test]
fn from_counts_derives_row_stochastic_tprobs() {
    let counts = SparseMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (0, 1, 3.0)]).unwrap();
    let msm = Msm::from_counts(counts).unwrap();
    assert_eq!(msm.tprobs().to_dense()[(0, 1)], 0.75);
    assert_eq!(msm.tprobs().row_sums()[1], 0.0);
    assert_eq!(msm.eq_probs(), &[1.0, 0.0]);
    assert_eq!(msm.n_states(), 2);
}

#[test]
fn misaligned_populations_rejected() {
    let counts = SparseMatrix::from_triplets(2, 2, &[(0, 1, 1.0)]).unwrap();
    let err = Msm::new(counts.clone(), vec![1.0], counts).unwrap_err();
    match err {
        FastError::Shape(info) => assert_eq!(info.code, "eq-probs-length"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn deserialization_revalidates_snapshot() {
    let counts = SparseMatrix::from_triplets(2, 2, &[(0, 1, 1.0)]).unwrap();
    let msm = Msm::from_counts(counts).unwrap();
    let mut json = serde_json::to_value(&msm).unwrap();
    json["eq_probs"] = serde_json::json!([0.5]);
    assert!(serde_json::from_value::<Msm>(json).is_err());
}
