#![allow(dead_code)]

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::{Msm, PathwayDecomposition, Pathways, SparseMatrix};

pub fn msm_from_triplets(n: usize, entries: &[(usize, usize, f64)]) -> Msm {
    let counts = SparseMatrix::from_triplets(n, n, entries).unwrap();
    Msm::from_counts(counts).unwrap()
}

/// Directed cycle `0 -> 1 -> ... -> n-1 -> 0` with unit counts.
pub fn cycle_msm(n: usize) -> Msm {
    let entries: Vec<_> = (0..n).map(|i| (i, (i + 1) % n, 1.0)).collect();
    msm_from_triplets(n, &entries)
}

/// Chain of `n` states where state `i` has been visited `i + 1` times.
pub fn graded_chain_msm(n: usize) -> Msm {
    let entries: Vec<_> = (0..n)
        .map(|i| (i, (i + 1) % n, (i + 1) as f64))
        .collect();
    msm_from_triplets(n, &entries)
}

/// Pathway solver returning fixed paths regardless of input.
pub struct FixedPaths {
    pub paths: Vec<Vec<usize>>,
}

impl PathwayDecomposition for FixedPaths {
    fn net_flux(
        &self,
        tprobs: &SparseMatrix,
        _start_states: &[usize],
        _end_states: &[usize],
        populations: &[f64],
    ) -> Result<SparseMatrix, FastError> {
        assert_eq!(tprobs.nrows(), populations.len());
        Ok(tprobs.clone())
    }

    fn paths(
        &self,
        _start_states: &[usize],
        _end_states: &[usize],
        _flux: &SparseMatrix,
        num_paths: usize,
    ) -> Result<Pathways, FastError> {
        let paths: Vec<Vec<usize>> = self.paths.iter().take(num_paths).cloned().collect();
        let fluxes = vec![1.0; paths.len()];
        Ok(Pathways { paths, fluxes })
    }
}

/// Pathway solver that always fails.
pub struct DisconnectedPaths;

impl PathwayDecomposition for DisconnectedPaths {
    fn net_flux(
        &self,
        _tprobs: &SparseMatrix,
        _start_states: &[usize],
        _end_states: &[usize],
        _populations: &[f64],
    ) -> Result<SparseMatrix, FastError> {
        Err(FastError::Pathway(ErrorInfo::new(
            "no-path",
            "start and end states are disconnected",
        )))
    }

    fn paths(
        &self,
        _start_states: &[usize],
        _end_states: &[usize],
        _flux: &SparseMatrix,
        _num_paths: usize,
    ) -> Result<Pathways, FastError> {
        Ok(Pathways::default())
    }
}

pub fn assert_close(a: &[f64], b: &[f64], tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch: {a:?} vs {b:?}");
    for (x, y) in a.iter().zip(b) {
        assert!((x - y).abs() <= tol, "{a:?} differs from {b:?}");
    }
}
