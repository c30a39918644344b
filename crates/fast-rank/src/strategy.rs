//! Ranking strategies and the shared selection driver.

use std::fmt;
use std::sync::Arc;

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::{discovered_states, MsmSnapshot, PathwayDecomposition, RngHandle, Scaling};
use log::debug;

use crate::adjacency::build_adjacency;
use crate::config::{FastWeights, PageRankOpts, SpreadingOpts};
use crate::distance::DistanceMetric;
use crate::pagerank::rank_adjacency;
use crate::ranking::Ranking;
use crate::select::{select_evens, select_top};
use crate::spreading::select_spreading;

/// Distance metric plus kernel settings enabling diversified selection.
#[derive(Clone)]
pub struct Diversity {
    /// Metric over state centers.
    pub metric: Arc<dyn DistanceMetric>,
    /// Kernel bandwidth and overlap policy.
    pub opts: SpreadingOpts,
}

impl fmt::Debug for Diversity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diversity")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

/// How a ranking is turned into a batch.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    /// Whether higher rankings are preferred.
    pub maximize: bool,
    /// Optional diversified selection; plain top-n selection otherwise.
    pub diversity: Option<Diversity>,
}

impl SelectionPolicy {
    /// Plain selection in the given direction.
    pub fn new(maximize: bool) -> Self {
        Self {
            maximize,
            diversity: None,
        }
    }
}

/// Ranks by total outgoing transition count; least sampled first by default.
pub struct Counts {
    /// Optional rescaling of the raw counts.
    pub scaling: Option<Box<dyn Scaling>>,
    /// Selection direction and diversification.
    pub policy: SelectionPolicy,
}

impl Counts {
    /// Minimising count ranking without rescaling.
    pub fn new() -> Self {
        Self {
            scaling: None,
            policy: SelectionPolicy::new(false),
        }
    }

    /// Rescales the raw counts before selection.
    pub fn with_scaling(mut self, scaling: impl Scaling + 'static) -> Self {
        self.scaling = Some(Box::new(scaling));
        self
    }
}

impl Default for Counts {
    fn default() -> Self {
        Self::new()
    }
}

/// Page-rank importance over the discovered-state subgraph.
pub struct PageRanking {
    /// Power iteration and adjacency options.
    pub opts: PageRankOpts,
    /// Selection direction and diversification.
    pub policy: SelectionPolicy,
}

impl PageRanking {
    /// Maximising page ranking with the given options.
    pub fn new(opts: PageRankOpts) -> Self {
        Self {
            opts,
            policy: SelectionPolicy::new(true),
        }
    }
}

/// Directed score blended with a statistical sampling score.
pub struct FastRanking {
    directed: Vec<f64>,
    directed_scaling: Box<dyn Scaling>,
    statistical: Option<Box<Strategy>>,
    statistical_scaling: Box<dyn Scaling>,
    weights: FastWeights,
    /// Selection direction and diversification.
    pub policy: SelectionPolicy,
}

impl FastRanking {
    /// Builds the composite ranking, validating `weights`.
    ///
    /// `directed` holds one precomputed value per state of the full index
    /// space. When `statistical` is `None` the statistical term is zero.
    pub fn new(
        directed: Vec<f64>,
        directed_scaling: Box<dyn Scaling>,
        statistical: Option<Strategy>,
        statistical_scaling: Box<dyn Scaling>,
        weights: FastWeights,
    ) -> Result<Self, FastError> {
        weights.validate()?;
        Ok(Self {
            directed,
            directed_scaling,
            statistical: statistical.map(Box::new),
            statistical_scaling,
            weights,
            policy: SelectionPolicy::new(true),
        })
    }

    /// Blend weights in use.
    pub fn weights(&self) -> FastWeights {
        self.weights
    }
}

/// Ranking restricted to states on the highest-flux pathways.
pub struct StringRanking {
    start_states: Vec<usize>,
    end_states: Vec<usize>,
    n_paths: usize,
    statistical: Option<Box<Strategy>>,
    pathways: Arc<dyn PathwayDecomposition>,
    /// Selection direction and diversification.
    pub policy: SelectionPolicy,
}

impl StringRanking {
    /// Pathway ranking between `start_states` and `end_states`.
    ///
    /// Path states are scored by `statistical`, or all zero when `None`.
    pub fn new(
        start_states: Vec<usize>,
        end_states: Vec<usize>,
        n_paths: usize,
        statistical: Option<Strategy>,
        pathways: Arc<dyn PathwayDecomposition>,
    ) -> Self {
        Self {
            start_states,
            end_states,
            n_paths,
            statistical: statistical.map(Box::new),
            pathways,
            policy: SelectionPolicy::new(true),
        }
    }
}

/// Closed family of ranking strategies sharing one selection driver.
pub enum Strategy {
    /// Uninformative ranking; selection spreads clones evenly.
    Evens,
    /// Raw transition counts.
    Counts(Counts),
    /// Page rank over the discovered-state adjacency.
    PageRank(PageRanking),
    /// Directed plus statistical composite.
    Fast(FastRanking),
    /// Pathway-restricted statistical ranking.
    String(StringRanking),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Strategy");
        out.field("kind", &self.name());
        if let Some(policy) = self.policy() {
            out.field("policy", policy);
        }
        out.finish_non_exhaustive()
    }
}

impl Strategy {
    /// Stable name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Evens => "evens",
            Strategy::Counts(_) => "counts",
            Strategy::PageRank(_) => "page-rank",
            Strategy::Fast(_) => "fast",
            Strategy::String(_) => "string",
        }
    }

    /// Selection policy, absent for evens.
    pub fn policy(&self) -> Option<&SelectionPolicy> {
        match self {
            Strategy::Evens => None,
            Strategy::Counts(inner) => Some(&inner.policy),
            Strategy::PageRank(inner) => Some(&inner.policy),
            Strategy::Fast(inner) => Some(&inner.policy),
            Strategy::String(inner) => Some(&inner.policy),
        }
    }

    /// Mutable selection policy, absent for evens.
    pub fn policy_mut(&mut self) -> Option<&mut SelectionPolicy> {
        match self {
            Strategy::Evens => None,
            Strategy::Counts(inner) => Some(&mut inner.policy),
            Strategy::PageRank(inner) => Some(&mut inner.policy),
            Strategy::Fast(inner) => Some(&mut inner.policy),
            Strategy::String(inner) => Some(&mut inner.policy),
        }
    }

    /// Ranks `unique_states`, or every discovered state when `None`.
    ///
    /// The result is aligned with the ranked states. The snapshot is only
    /// read.
    pub fn rank(
        &self,
        msm: &dyn MsmSnapshot,
        unique_states: Option<&[usize]>,
    ) -> Result<Ranking, FastError> {
        let states = match unique_states {
            Some(states) => states.to_vec(),
            None => discovered_states(msm),
        };
        match self {
            Strategy::Evens => Ok(Ranking::uniform(states, 0.0)),
            Strategy::Counts(inner) => rank_counts(inner, msm, states),
            Strategy::PageRank(inner) => rank_page(inner, msm, states),
            Strategy::Fast(inner) => rank_fast(inner, msm, states),
            Strategy::String(inner) => rank_string(inner, msm, states),
        }
    }

    /// Selects exactly `n_clones` states to simulate next.
    pub fn select_states(
        &self,
        msm: &dyn MsmSnapshot,
        n_clones: usize,
        rng: &mut RngHandle,
    ) -> Result<Vec<usize>, FastError> {
        self.rank_and_select(msm, n_clones, rng)
            .map(|(_, selection)| selection)
    }

    /// Runs the selection driver and also returns the ranking it used.
    ///
    /// The ranking is `None` when selection fell back to evens before any
    /// ranking was computed.
    pub fn rank_and_select(
        &self,
        msm: &dyn MsmSnapshot,
        n_clones: usize,
        rng: &mut RngHandle,
    ) -> Result<(Option<Ranking>, Vec<usize>), FastError> {
        let unique_states = discovered_states(msm);
        let policy = match self.policy() {
            Some(policy) => policy,
            None => return Ok((None, select_evens(&unique_states, n_clones, rng)?)),
        };
        if unique_states.len() < n_clones {
            debug!(
                "{}: {} discovered states for {} clones; selecting evenly",
                self.name(),
                unique_states.len(),
                n_clones
            );
            return Ok((None, select_evens(&unique_states, n_clones, rng)?));
        }

        let ranking = self.rank(msm, Some(&unique_states))?;
        let (eligible_states, eligible_scores) = ranking.eligible();
        if eligible_states.len() < n_clones {
            debug!(
                "{}: {} eligible states for {} clones; selecting evenly among them",
                self.name(),
                eligible_states.len(),
                n_clones
            );
            let selection = select_evens(&eligible_states, n_clones, rng)?;
            return Ok((Some(ranking), selection));
        }

        let selection = match &policy.diversity {
            Some(diversity) => {
                debug!("{}: diversified selection of {n_clones} states", self.name());
                select_spreading(
                    &eligible_scores,
                    &eligible_states,
                    n_clones,
                    diversity.metric.as_ref(),
                    policy.maximize,
                    &diversity.opts,
                    rng,
                )?
            }
            None => select_top(
                &eligible_states,
                &eligible_scores,
                n_clones,
                policy.maximize,
                rng,
            )?,
        };
        Ok((Some(ranking), selection))
    }
}

fn gather(values: &[f64], states: &[usize], what: &str) -> Result<Vec<f64>, FastError> {
    states
        .iter()
        .map(|&state| {
            values.get(state).copied().ok_or_else(|| {
                FastError::Shape(
                    ErrorInfo::new("state-out-of-range", format!("{what} do not cover state"))
                        .with_context("state", state)
                        .with_context("len", values.len()),
                )
            })
        })
        .collect()
}

fn rank_counts(
    counts: &Counts,
    msm: &dyn MsmSnapshot,
    states: Vec<usize>,
) -> Result<Ranking, FastError> {
    let per_state = msm.tcounts().row_sums();
    let values = gather(&per_state, &states, "transition counts")?;
    let ranking = Ranking::from_values(states, values)?;
    match &counts.scaling {
        Some(scaling) => ranking.rescaled(scaling.as_ref()),
        None => Ok(ranking),
    }
}

fn rank_page(
    page: &PageRanking,
    msm: &dyn MsmSnapshot,
    states: Vec<usize>,
) -> Result<Ranking, FastError> {
    let sub_counts = msm.tcounts().submatrix(&states)?;
    let aij = build_adjacency(&sub_counts, page.opts.spreading)?;
    let prior = if page.opts.init_pops {
        Some(gather(msm.eq_probs(), &states, "equilibrium populations")?)
    } else {
        None
    };
    let values = rank_adjacency(&aij, prior.as_deref(), &page.opts)?;
    Ranking::from_values(states, values)
}

fn rank_fast(
    fast: &FastRanking,
    msm: &dyn MsmSnapshot,
    states: Vec<usize>,
) -> Result<Ranking, FastError> {
    let statistical = match &fast.statistical {
        Some(component) => component
            .rank(msm, Some(&states))?
            .rescaled(fast.statistical_scaling.as_ref())?,
        None => Ranking::uniform(states.clone(), 0.0),
    };
    let directed_raw = gather(&fast.directed, &states, "directed rankings")?;
    let directed =
        Ranking::from_values(states, directed_raw)?.rescaled(fast.directed_scaling.as_ref())?;
    let FastWeights {
        alpha,
        alpha_percent,
    } = fast.weights;
    if alpha_percent {
        directed.combine(&statistical, |d, s| (1.0 - alpha) * d + alpha * s)
    } else {
        directed.combine(&statistical, |d, s| d + alpha * s)
    }
}

fn rank_string(
    string: &StringRanking,
    msm: &dyn MsmSnapshot,
    states: Vec<usize>,
) -> Result<Ranking, FastError> {
    let statistical = match &string.statistical {
        Some(component) => component.rank(msm, Some(&states))?,
        None => Ranking::uniform(states.clone(), 0.0),
    };
    let flux = string.pathways.net_flux(
        msm.tprobs(),
        &string.start_states,
        &string.end_states,
        msm.eq_probs(),
    )?;
    let pathways = string.pathways.paths(
        &string.start_states,
        &string.end_states,
        &flux,
        string.n_paths,
    )?;
    let path_states = pathways.state_union();
    let missing = path_states
        .iter()
        .filter(|&&state| !statistical.states().contains(&state))
        .count();
    if missing > 0 {
        debug!("string: {missing} pathway states are not among the ranked states");
    }
    Ok(statistical.restricted_to(&path_states))
}
