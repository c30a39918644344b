//! Per-state ranking vectors with an explicit ineligible marker.

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::Scaling;
use serde::{Deserialize, Serialize};

use crate::select::check_aligned;

/// Per-state ranking aligned with a list of state indices.
///
/// A score of `None` marks the state ineligible for selection. `NaN` is never
/// stored: constructors turn it into `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    states: Vec<usize>,
    scores: Vec<Option<f64>>,
}

impl Ranking {
    /// Pairs `states` with optional scores of the same length.
    pub fn new(states: Vec<usize>, scores: Vec<Option<f64>>) -> Result<Self, FastError> {
        check_aligned(states.len(), scores.len())?;
        let scores = scores
            .into_iter()
            .map(|score| score.filter(|value| !value.is_nan()))
            .collect();
        Ok(Self { states, scores })
    }

    /// Pairs `states` with plain values; `NaN` values become ineligible.
    pub fn from_values(states: Vec<usize>, values: Vec<f64>) -> Result<Self, FastError> {
        Self::new(states, values.into_iter().map(Some).collect())
    }

    /// Gives every state the same score.
    pub fn uniform(states: Vec<usize>, value: f64) -> Self {
        let scores = vec![Some(value); states.len()];
        Self { states, scores }
    }

    /// State indices, in ranking order.
    pub fn states(&self) -> &[usize] {
        &self.states
    }

    /// Scores aligned with [`Ranking::states`].
    pub fn scores(&self) -> &[Option<f64>] {
        &self.scores
    }

    /// Number of ranked states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state is ranked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Score of `state`, `None` if unranked or ineligible.
    pub fn score_of(&self, state: usize) -> Option<f64> {
        self.states
            .iter()
            .position(|&s| s == state)
            .and_then(|pos| self.scores[pos])
    }

    /// Splits off the eligible states and their scores.
    pub fn eligible(&self) -> (Vec<usize>, Vec<f64>) {
        self.states
            .iter()
            .zip(&self.scores)
            .filter_map(|(&state, score)| score.map(|value| (state, value)))
            .unzip()
    }

    /// Rescales the eligible scores; ineligible entries stay ineligible.
    pub fn rescaled(&self, scaling: &dyn Scaling) -> Result<Self, FastError> {
        let (_, values) = self.eligible();
        let scaled = scaling.scale(&values);
        if scaled.len() != values.len() {
            return Err(FastError::Shape(
                ErrorInfo::new("scaling-length", "scaling changed the number of values")
                    .with_context("expected", values.len())
                    .with_context("len", scaled.len()),
            ));
        }
        let mut scaled = scaled.into_iter();
        let scores = self
            .scores
            .iter()
            .map(|score| score.and_then(|_| scaled.next()))
            .collect();
        Self::new(self.states.clone(), scores)
    }

    /// Combines two rankings over the same states element-wise.
    ///
    /// A state is ineligible in the result when it is ineligible in either
    /// input.
    pub fn combine(
        &self,
        other: &Ranking,
        mut f: impl FnMut(f64, f64) -> f64,
    ) -> Result<Self, FastError> {
        if self.states != other.states {
            return Err(FastError::Shape(
                ErrorInfo::new("ranking-states", "combined rankings cover different states")
                    .with_context("left", self.states.len())
                    .with_context("right", other.states.len()),
            ));
        }
        let scores = self
            .scores
            .iter()
            .zip(&other.scores)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(f(*a, *b)),
                _ => None,
            })
            .collect();
        Self::new(self.states.clone(), scores)
    }

    /// Marks every state outside `keep` (sorted) as ineligible.
    pub fn restricted_to(&self, keep: &[usize]) -> Self {
        let scores = self
            .states
            .iter()
            .zip(&self.scores)
            .map(|(state, score)| {
                if keep.binary_search(state).is_ok() {
                    *score
                } else {
                    None
                }
            })
            .collect();
        Self {
            states: self.states.clone(),
            scores,
        }
    }
}
