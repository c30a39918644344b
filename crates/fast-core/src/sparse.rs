//! Sparse transition matrices and the linear-operator seam used by ranking.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FastError};

/// Anything that can act on a dense vector as a square or rectangular matrix.
///
/// Power iteration only needs `y = A x`, so it is written against this trait
/// and stays agnostic to how the adjacency is stored.
pub trait LinearOperator {
    /// Returns `(rows, cols)`.
    fn shape(&self) -> (usize, usize);

    /// Computes the matrix-vector product `A x`.
    fn apply(&self, x: &[f64]) -> Result<Vec<f64>, FastError>;
}

/// Compressed sparse row matrix of `f64` values.
///
/// Duplicates are summed on construction. Explicitly stored zeros survive
/// until a caller filters them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TripletForm", try_from = "TripletForm")]
pub struct SparseMatrix {
    csr: CsrMatrix<f64>,
}

/// Coordinate representation used on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TripletForm {
    rows: usize,
    cols: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl From<SparseMatrix> for TripletForm {
    fn from(matrix: SparseMatrix) -> Self {
        TripletForm {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
            entries: matrix.triplets().collect(),
        }
    }
}

impl TryFrom<TripletForm> for SparseMatrix {
    type Error = FastError;

    fn try_from(form: TripletForm) -> Result<Self, Self::Error> {
        SparseMatrix::from_triplets(form.rows, form.cols, &form.entries)
    }
}

impl SparseMatrix {
    /// Creates an all-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            csr: CsrMatrix::zeros(rows, cols),
        }
    }

    /// Builds a matrix from `(row, col, value)` triplets, summing duplicates.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        entries: &[(usize, usize, f64)],
    ) -> Result<Self, FastError> {
        if let Some(&(row, col, _)) = entries
            .iter()
            .find(|&&(row, col, _)| row >= rows || col >= cols)
        {
            return Err(FastError::Shape(
                ErrorInfo::new("entry-out-of-bounds", "triplet lies outside the matrix")
                    .with_context("row", row)
                    .with_context("col", col)
                    .with_context("rows", rows)
                    .with_context("cols", cols),
            ));
        }
        let row_indices = entries.iter().map(|entry| entry.0).collect();
        let col_indices = entries.iter().map(|entry| entry.1).collect();
        let values = entries.iter().map(|entry| entry.2).collect();
        let coo = CooMatrix::try_from_triplets(rows, cols, row_indices, col_indices, values)
            .map_err(|err| FastError::shape("invalid-triplets", err.to_string()))?;
        Ok(Self {
            csr: CsrMatrix::from(&coo),
        })
    }

    /// Expands the matrix into dense storage.
    pub fn to_dense(&self) -> DMatrix<f64> {
        DMatrix::from(&self.csr)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.csr.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.csr.ncols()
    }

    /// Returns true when the matrix has as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Number of stored entries, including explicit zeros.
    pub fn nnz(&self) -> usize {
        self.csr.nnz()
    }

    /// Iterates the stored `(col, value)` pairs of one row; empty past the
    /// last row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.csr
            .get_row(row)
            .map(|lane| {
                lane.col_indices()
                    .iter()
                    .copied()
                    .zip(lane.values().iter().copied())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into_iter()
    }

    /// Iterates every stored entry as `(row, col, value)` in row-major order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.csr
            .triplet_iter()
            .map(|(row, col, value)| (row, col, *value))
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        Self {
            csr: self.csr.transpose(),
        }
    }

    /// Sums every row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.csr
            .row_iter()
            .map(|lane| lane.values().iter().sum())
            .collect()
    }

    /// Applies `f` to every stored value, keeping the sparsity pattern.
    pub fn map_values(&self, mut f: impl FnMut(usize, usize, f64) -> f64) -> Self {
        let mut csr = self.csr.clone();
        for (row, col, value) in csr.triplet_iter_mut() {
            *value = f(row, col, *value);
        }
        Self { csr }
    }

    /// Element-wise sum of two matrices with identical shape.
    pub fn add(&self, other: &SparseMatrix) -> Result<Self, FastError> {
        if self.nrows() != other.nrows() || self.ncols() != other.ncols() {
            return Err(FastError::Shape(
                ErrorInfo::new("shape-mismatch", "cannot add matrices of different shapes")
                    .with_context("left", format!("{}x{}", self.nrows(), self.ncols()))
                    .with_context("right", format!("{}x{}", other.nrows(), other.ncols())),
            ));
        }
        Ok(Self {
            csr: &self.csr + &other.csr,
        })
    }

    /// Restricts a square matrix to the given row/column indices.
    ///
    /// Entry `(a, b)` of the result is entry `(states[a], states[b])` of
    /// `self`.
    pub fn submatrix(&self, states: &[usize]) -> Result<Self, FastError> {
        if !self.is_square() {
            return Err(FastError::Shape(
                ErrorInfo::new("not-square", "submatrix requires a square matrix")
                    .with_context("rows", self.nrows())
                    .with_context("cols", self.ncols()),
            ));
        }
        let dimension = self.ncols();
        let mut position = vec![None; dimension];
        for (new_idx, &state) in states.iter().enumerate() {
            let slot = position.get_mut(state).ok_or_else(|| {
                FastError::Shape(
                    ErrorInfo::new("state-out-of-bounds", "state index exceeds matrix dimension")
                        .with_context("state", state)
                        .with_context("dimension", dimension),
                )
            })?;
            *slot = Some(new_idx);
        }
        let entries: Vec<_> = states
            .iter()
            .enumerate()
            .flat_map(|(new_row, &state)| {
                let position = &position;
                self.row(state)
                    .filter_map(move |(col, value)| position[col].map(|c| (new_row, c, value)))
            })
            .collect();
        Self::from_triplets(states.len(), states.len(), &entries)
    }
}

fn check_operand(shape: (usize, usize), len: usize) -> Result<(), FastError> {
    if shape.1 != len {
        return Err(FastError::Shape(
            ErrorInfo::new("operand-length", "vector length does not match matrix columns")
                .with_context("cols", shape.1)
                .with_context("len", len),
        ));
    }
    Ok(())
}

impl LinearOperator for SparseMatrix {
    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn apply(&self, x: &[f64]) -> Result<Vec<f64>, FastError> {
        check_operand(LinearOperator::shape(self), x.len())?;
        let product = &self.csr * &DVector::from_column_slice(x);
        Ok(product.iter().copied().collect())
    }
}

impl LinearOperator for DMatrix<f64> {
    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn apply(&self, x: &[f64]) -> Result<Vec<f64>, FastError> {
        check_operand(LinearOperator::shape(self), x.len())?;
        let product = self * DVector::from_column_slice(x);
        Ok(product.iter().copied().collect())
    }
}
