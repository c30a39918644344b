//! Contract for the external network-flux / highest-flux pathway solver.

use crate::errors::FastError;
use crate::sparse::SparseMatrix;

/// Pathways returned by [`PathwayDecomposition::paths`], ordered by flux.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pathways {
    /// Each pathway as the sequence of state indices it visits.
    pub paths: Vec<Vec<usize>>,
    /// Flux carried by each pathway, aligned with `paths`.
    pub fluxes: Vec<f64>,
}

impl Pathways {
    /// Sorted, deduplicated union of every state on any pathway.
    pub fn state_union(&self) -> Vec<usize> {
        let mut states: Vec<usize> = self.paths.iter().flatten().copied().collect();
        states.sort_unstable();
        states.dedup();
        states
    }
}

/// Transition-path-theory decomposition consumed by pathway ranking.
pub trait PathwayDecomposition: Send + Sync {
    /// Net flux matrix between `start_states` and `end_states`.
    fn net_flux(
        &self,
        tprobs: &SparseMatrix,
        start_states: &[usize],
        end_states: &[usize],
        populations: &[f64],
    ) -> Result<SparseMatrix, FastError>;

    /// Top `num_paths` highest-flux pathways through `flux`.
    fn paths(
        &self,
        start_states: &[usize],
        end_states: &[usize],
        flux: &SparseMatrix,
        num_paths: usize,
    ) -> Result<Pathways, FastError>;
}
