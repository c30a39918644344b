//! Pairwise distances between state centers for diversified selection.

use std::fmt;

use fast_core::errors::{ErrorInfo, FastError};
use nalgebra::DMatrix;
use ndarray::{s, Array2, Array3, ArrayView1, Axis, ShapeBuilder};

/// Evaluates distances from one query state to a set of reference states.
pub trait DistanceMetric: Send + Sync {
    /// Returns one distance per entry of `references`, in the same order.
    fn distances(&self, references: &[usize], query: usize) -> Result<Vec<f64>, FastError>;
}

/// Euclidean norm of a component vector.
pub fn euclidean(components: ArrayView1<'_, f64>) -> f64 {
    components.dot(&components).sqrt()
}

type ComponentMetric = Box<dyn Fn(ArrayView1<'_, f64>) -> f64 + Send + Sync>;

/// Reads distances from a precomputed table over every pair of states.
///
/// The table is indexed `[query, reference, component]`; the components of
/// one pair are collapsed to a scalar by the metric, Euclidean by default.
pub struct DistanceLookup {
    table: Array3<f64>,
    metric: ComponentMetric,
}

fn table_shape_error(message: &str, shape: &[usize]) -> FastError {
    FastError::Shape(
        ErrorInfo::new("distance-table-shape", message).with_context("shape", format!("{shape:?}")),
    )
}

impl DistanceLookup {
    /// Wraps an `n_states x n_states x components` table.
    pub fn new(table: Array3<f64>) -> Result<Self, FastError> {
        let (queries, references, components) = table.dim();
        if queries != references || components == 0 {
            return Err(table_shape_error(
                "distance table must be square with at least one component",
                table.shape(),
            ));
        }
        Ok(Self {
            table,
            metric: Box::new(euclidean),
        })
    }

    /// Single-component table from a square array of pair distances.
    pub fn from_pairwise(distances: Array2<f64>) -> Result<Self, FastError> {
        Self::new(distances.insert_axis(Axis(2)))
    }

    /// Single-component table from a square matrix of pair distances.
    pub fn from_matrix(distances: &DMatrix<f64>) -> Result<Self, FastError> {
        let shape = [distances.nrows(), distances.ncols()];
        let pairwise = Array2::from_shape_vec(
            (distances.nrows(), distances.ncols()).f(),
            distances.as_slice().to_vec(),
        )
        .map_err(|_| table_shape_error("pair distance matrix has inconsistent storage", &shape))?;
        Self::from_pairwise(pairwise)
    }

    /// Replaces the component reduction.
    pub fn with_metric(
        mut self,
        metric: impl Fn(ArrayView1<'_, f64>) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.metric = Box::new(metric);
        self
    }

    /// Number of states covered by the table.
    pub fn n_states(&self) -> usize {
        self.table.dim().0
    }

    fn check_state(&self, state: usize) -> Result<(), FastError> {
        if state >= self.n_states() {
            return Err(FastError::Shape(
                ErrorInfo::new("distance-lookup-range", "state is not covered by the table")
                    .with_context("state", state)
                    .with_context("n_states", self.n_states()),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for DistanceLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceLookup")
            .field("shape", &self.table.shape())
            .finish_non_exhaustive()
    }
}

impl DistanceMetric for DistanceLookup {
    fn distances(&self, references: &[usize], query: usize) -> Result<Vec<f64>, FastError> {
        self.check_state(query)?;
        references
            .iter()
            .map(|&reference| {
                self.check_state(reference)?;
                Ok((self.metric)(self.table.slice(s![query, reference, ..])))
            })
            .collect()
    }
}

/// Euclidean distances between explicit state-center coordinates.
///
/// Row `i` of the array is the center of state `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterCoordinates {
    centers: Array2<f64>,
}

impl CenterCoordinates {
    /// Wraps one coordinate vector per state; all must share a dimension.
    pub fn new(centers: Vec<Vec<f64>>) -> Result<Self, FastError> {
        let dimension = centers.first().map_or(0, Vec::len);
        if let Some(bad) = centers.iter().position(|c| c.len() != dimension) {
            return Err(FastError::Shape(
                ErrorInfo::new("center-dimension", "state centers differ in dimension")
                    .with_context("state", bad)
                    .with_context("expected", dimension),
            ));
        }
        let n_states = centers.len();
        let flat: Vec<f64> = centers.into_iter().flatten().collect();
        let centers = Array2::from_shape_vec((n_states, dimension), flat).map_err(|err| {
            FastError::shape("center-dimension", format!("cannot shape centers: {err}"))
        })?;
        Ok(Self { centers })
    }

    /// Wraps an `n_states x dimension` array of centers.
    pub fn from_array(centers: Array2<f64>) -> Self {
        Self { centers }
    }

    fn center(&self, state: usize) -> Result<ArrayView1<'_, f64>, FastError> {
        if state >= self.centers.nrows() {
            return Err(FastError::Shape(
                ErrorInfo::new("center-range", "no center recorded for state")
                    .with_context("state", state)
                    .with_context("n_states", self.centers.nrows()),
            ));
        }
        Ok(self.centers.row(state))
    }
}

impl DistanceMetric for CenterCoordinates {
    fn distances(&self, references: &[usize], query: usize) -> Result<Vec<f64>, FastError> {
        let frame = self.center(query)?;
        references
            .iter()
            .map(|&reference| {
                let offset = &self.center(reference)? - &frame;
                Ok(euclidean(offset.view()))
            })
            .collect()
    }
}
