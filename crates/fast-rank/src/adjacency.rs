//! Adjacency construction from transition counts.

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::SparseMatrix;

/// Builds the propagation operator used by page ranking from transition counts.
///
/// Only connectivity survives: every nonzero off-diagonal count becomes a unit
/// edge `j -> i` for a count at `(j, i)`, and self-transitions are dropped.
///
/// In page-rank mode the result is column-stochastic with
/// `aij[i, j] = 1 / outdeg(j)`. A state without outgoing edges keeps a
/// divisor of one, so its column stays empty. In spreading mode the edge set
/// is symmetrised as `(A + A^T) / 2` and then L1-normalised per row; rows
/// without weight stay zero.
pub fn build_adjacency(counts: &SparseMatrix, spreading: bool) -> Result<SparseMatrix, FastError> {
    if !counts.is_square() {
        return Err(FastError::Shape(
            ErrorInfo::new("counts-not-square", "adjacency requires square transition counts")
                .with_context("rows", counts.nrows())
                .with_context("cols", counts.ncols()),
        ));
    }
    let n = counts.nrows();
    let edges: Vec<(usize, usize, f64)> = counts
        .triplets()
        .filter(|&(row, col, value)| row != col && value != 0.0)
        .map(|(row, col, _)| (row, col, 1.0))
        .collect();
    let structure = SparseMatrix::from_triplets(n, n, &edges)?;

    if spreading {
        let symmetric = structure
            .add(&structure.transpose())?
            .map_values(|_, _, value| value / 2.0);
        let row_weight = symmetric.row_sums();
        Ok(symmetric.map_values(|row, _, value| {
            if row_weight[row] > 0.0 {
                value / row_weight[row]
            } else {
                value
            }
        }))
    } else {
        let out_degree: Vec<f64> = structure
            .row_sums()
            .into_iter()
            .map(|degree| if degree == 0.0 { 1.0 } else { degree })
            .collect();
        Ok(structure
            .transpose()
            .map_values(|_, col, value| value / out_degree[col]))
    }
}
