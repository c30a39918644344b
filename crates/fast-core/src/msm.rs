//! Read-only Markov state model snapshot consumed by the ranking engine.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FastError};
use crate::sparse::SparseMatrix;

/// Contract for an MSM built from prior simulation data.
///
/// All three quantities share one state indexing. Implementations are never
/// mutated by ranking or selection.
pub trait MsmSnapshot {
    /// Square, nonnegative transition-count matrix.
    fn tcounts(&self) -> &SparseMatrix;

    /// Equilibrium population of every state.
    fn eq_probs(&self) -> &[f64];

    /// Transition-probability matrix, used by pathway strategies.
    fn tprobs(&self) -> &SparseMatrix;

    /// Total number of states in the index space.
    fn n_states(&self) -> usize {
        self.tcounts().nrows()
    }
}

/// Owned MSM snapshot with validated shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MsmParts")]
pub struct Msm {
    tcounts: SparseMatrix,
    eq_probs: Vec<f64>,
    tprobs: SparseMatrix,
}

#[derive(Deserialize)]
struct MsmParts {
    tcounts: SparseMatrix,
    eq_probs: Vec<f64>,
    tprobs: SparseMatrix,
}

impl TryFrom<MsmParts> for Msm {
    type Error = FastError;

    fn try_from(parts: MsmParts) -> Result<Self, Self::Error> {
        Msm::new(parts.tcounts, parts.eq_probs, parts.tprobs)
    }
}

impl Msm {
    /// Builds a snapshot, checking that every component is square and aligned.
    pub fn new(
        tcounts: SparseMatrix,
        eq_probs: Vec<f64>,
        tprobs: SparseMatrix,
    ) -> Result<Self, FastError> {
        if !tcounts.is_square() {
            return Err(FastError::Shape(
                ErrorInfo::new("counts-not-square", "transition counts must be square")
                    .with_context("rows", tcounts.nrows())
                    .with_context("cols", tcounts.ncols()),
            ));
        }
        let n = tcounts.nrows();
        if tprobs.nrows() != n || tprobs.ncols() != n {
            return Err(FastError::Shape(
                ErrorInfo::new("tprobs-shape", "transition probabilities must match counts")
                    .with_context("expected", n)
                    .with_context("rows", tprobs.nrows())
                    .with_context("cols", tprobs.ncols()),
            ));
        }
        if eq_probs.len() != n {
            return Err(FastError::Shape(
                ErrorInfo::new("eq-probs-length", "equilibrium populations must match counts")
                    .with_context("expected", n)
                    .with_context("len", eq_probs.len()),
            ));
        }
        if tcounts.triplets().any(|(_, _, value)| value < 0.0) {
            return Err(FastError::validation(
                "negative-counts",
                "transition counts must be nonnegative",
            ));
        }
        Ok(Self {
            tcounts,
            eq_probs,
            tprobs,
        })
    }

    /// Builds a snapshot from counts alone.
    ///
    /// Transition probabilities are the row-normalised counts and populations
    /// are proportional to each state's total observed count. Useful for
    /// fixtures and for strategies that never read the derived quantities.
    pub fn from_counts(tcounts: SparseMatrix) -> Result<Self, FastError> {
        let row_sums = tcounts.row_sums();
        let tprobs = tcounts.map_values(|row, _, value| {
            if row_sums[row] > 0.0 {
                value / row_sums[row]
            } else {
                0.0
            }
        });
        let total: f64 = row_sums.iter().sum();
        let eq_probs = if total > 0.0 {
            row_sums.iter().map(|sum| sum / total).collect()
        } else {
            vec![0.0; row_sums.len()]
        };
        Self::new(tcounts, eq_probs, tprobs)
    }
}

impl MsmSnapshot for Msm {
    fn tcounts(&self) -> &SparseMatrix {
        &self.tcounts
    }

    fn eq_probs(&self) -> &[f64] {
        &self.eq_probs
    }

    fn tprobs(&self) -> &SparseMatrix {
        &self.tprobs
    }
}

/// Returns the sorted indices of states with a nonzero count in their row
/// or column.
///
/// Derived fresh on every call; explicitly stored zeros do not count.
pub fn discovered_states(msm: &dyn MsmSnapshot) -> Vec<usize> {
    let tcounts = msm.tcounts();
    let mut seen = vec![false; tcounts.nrows().max(tcounts.ncols())];
    for (row, col, value) in tcounts.triplets() {
        if value != 0.0 {
            seen[row] = true;
            seen[col] = true;
        }
    }
    seen.iter()
        .enumerate()
        .filter_map(|(state, &hit)| hit.then_some(state))
        .collect()
}
