//! Serde configuration schema and strategy builders.

use std::sync::Arc;

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::{FeatureScale, Identity, PathwayDecomposition, Scaling};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::strategy::{
    Counts, Diversity, FastRanking, PageRanking, SelectionPolicy, Strategy, StringRanking,
};

fn serde_error(code: &str, err: impl ToString) -> FastError {
    FastError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn default_true() -> bool {
    true
}

fn default_damping() -> f64 {
    0.85
}

fn default_max_iters() -> usize {
    100_000
}

/// Power iteration and adjacency settings for page ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRankOpts {
    /// Weight of propagation against the prior, in `[0, 1]`.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Iteration cap before reporting non-convergence.
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// Rescale the result so it sums to 100.
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Build a symmetrised, row-stochastic adjacency.
    #[serde(default)]
    pub spreading: bool,
    /// Seed the prior with equilibrium populations.
    #[serde(default = "default_true")]
    pub init_pops: bool,
}

impl Default for PageRankOpts {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            max_iters: default_max_iters(),
            normalize: true,
            spreading: false,
            init_pops: true,
        }
    }
}

fn default_width() -> f64 {
    1.0
}

/// Gaussian repulsion settings for diversified selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadingOpts {
    /// Kernel bandwidth.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Never pick the same state twice.
    #[serde(default = "default_true")]
    pub non_overlap: bool,
}

impl Default for SpreadingOpts {
    fn default() -> Self {
        Self {
            width: default_width(),
            non_overlap: true,
        }
    }
}

fn default_alpha() -> f64 {
    1.0
}

/// Blend of directed and statistical components in FAST.
///
/// `total = directed + alpha * statistical`, or with `alpha_percent`
/// `total = (1 - alpha) * directed + alpha * statistical`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FastWeights {
    /// Statistical weight.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Treat `alpha` as a fraction in `[0, 1]`.
    #[serde(default)]
    pub alpha_percent: bool,
}

impl Default for FastWeights {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            alpha_percent: false,
        }
    }
}

impl FastWeights {
    /// Rejects a fractional `alpha` outside `[0, 1]`.
    ///
    /// A non-fractional `alpha` is not bounds checked.
    pub fn validate(&self) -> Result<(), FastError> {
        if self.alpha_percent && !(0.0..=1.0).contains(&self.alpha) {
            return Err(FastError::Validation(
                ErrorInfo::new("alpha-out-of-range", "fractional alpha must lie in [0, 1]")
                    .with_context("alpha", self.alpha),
            ));
        }
        Ok(())
    }
}

/// Serializable choice of scaling function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScalingConfig {
    /// Min-max feature scaling.
    FeatureScale {
        /// Larger inputs score higher.
        #[serde(default = "default_true")]
        maximize: bool,
    },
    /// No rescaling.
    Identity,
}

impl ScalingConfig {
    /// Instantiates the scaling function.
    pub fn build(&self) -> Box<dyn Scaling> {
        match self {
            ScalingConfig::FeatureScale { maximize } => Box::new(FeatureScale {
                maximize: *maximize,
            }),
            ScalingConfig::Identity => Box::new(Identity),
        }
    }
}

fn default_directed_scaling() -> ScalingConfig {
    ScalingConfig::FeatureScale { maximize: true }
}

fn default_statistical_scaling() -> ScalingConfig {
    ScalingConfig::FeatureScale { maximize: false }
}

fn default_fast_statistical() -> Option<Box<StrategyConfig>> {
    Some(Box::new(StrategyConfig::Counts {
        maximize: false,
        scaling: None,
    }))
}

fn default_n_paths() -> usize {
    1
}

/// Serializable description of a ranking strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StrategyConfig {
    /// Evenly spread clones over discovered states.
    Evens,
    /// Rank by outgoing transition counts.
    Counts {
        /// Prefer higher counts.
        #[serde(default)]
        maximize: bool,
        /// Optional rescaling of the counts.
        #[serde(default)]
        scaling: Option<ScalingConfig>,
    },
    /// Page rank over the discovered-state adjacency.
    PageRank {
        /// Prefer higher page rank.
        #[serde(default = "default_true")]
        maximize: bool,
        /// Power iteration settings.
        #[serde(default)]
        pagerank: PageRankOpts,
    },
    /// Directed plus statistical composite.
    Fast {
        /// Prefer higher totals.
        #[serde(default = "default_true")]
        maximize: bool,
        /// Blend weights.
        #[serde(default)]
        weights: FastWeights,
        /// Scaling of the directed rankings.
        #[serde(default = "default_directed_scaling")]
        directed_scaling: ScalingConfig,
        /// Statistical component; `null` for a zero statistical term.
        #[serde(default = "default_fast_statistical")]
        statistical: Option<Box<StrategyConfig>>,
        /// Scaling of the statistical component.
        #[serde(default = "default_statistical_scaling")]
        statistical_scaling: ScalingConfig,
    },
    /// Pathway-restricted ranking.
    String {
        /// Pathway sources.
        start_states: Vec<usize>,
        /// Pathway sinks.
        end_states: Vec<usize>,
        /// Number of highest-flux pathways to union.
        #[serde(default = "default_n_paths")]
        n_paths: usize,
        /// Statistical ranking of path states; zero when absent.
        #[serde(default)]
        statistical: Option<Box<StrategyConfig>>,
        /// Prefer higher statistical scores.
        #[serde(default = "default_true")]
        maximize: bool,
    },
}

/// Collaborators that cannot be described in a configuration file.
#[derive(Clone, Default)]
pub struct StrategyInputs {
    /// Precomputed directed ranking per state, required by FAST.
    pub directed_rankings: Option<Vec<f64>>,
    /// Flux decomposition, required by the string strategy.
    pub pathways: Option<Arc<dyn PathwayDecomposition>>,
    /// Metric over state centers; enables diversified selection.
    pub distance: Option<Arc<dyn DistanceMetric>>,
}

fn missing_input(strategy: &str, input: &str) -> FastError {
    FastError::Validation(
        ErrorInfo::new("missing-input", "strategy requires a collaborator")
            .with_context("strategy", strategy)
            .with_context("input", input),
    )
}

impl StrategyConfig {
    /// Builds the strategy, attaching `diversity` to its selection policy.
    ///
    /// Embedded statistical components are built without diversity since
    /// they only rank.
    pub fn build(
        &self,
        inputs: &StrategyInputs,
        diversity: Option<Diversity>,
    ) -> Result<Strategy, FastError> {
        let mut strategy = match self {
            StrategyConfig::Evens => Strategy::Evens,
            StrategyConfig::Counts { maximize, scaling } => Strategy::Counts(Counts {
                scaling: scaling.as_ref().map(ScalingConfig::build),
                policy: SelectionPolicy::new(*maximize),
            }),
            StrategyConfig::PageRank { maximize, pagerank } => {
                let mut page = PageRanking::new(*pagerank);
                page.policy.maximize = *maximize;
                Strategy::PageRank(page)
            }
            StrategyConfig::Fast {
                maximize,
                weights,
                directed_scaling,
                statistical,
                statistical_scaling,
            } => {
                let directed = inputs
                    .directed_rankings
                    .clone()
                    .ok_or_else(|| missing_input("fast", "directed_rankings"))?;
                let statistical = statistical
                    .as_ref()
                    .map(|component| component.build(inputs, None))
                    .transpose()?;
                let mut fast = FastRanking::new(
                    directed,
                    directed_scaling.build(),
                    statistical,
                    statistical_scaling.build(),
                    *weights,
                )?;
                fast.policy.maximize = *maximize;
                Strategy::Fast(fast)
            }
            StrategyConfig::String {
                start_states,
                end_states,
                n_paths,
                statistical,
                maximize,
            } => {
                let pathways = inputs
                    .pathways
                    .clone()
                    .ok_or_else(|| missing_input("string", "pathways"))?;
                let statistical = statistical
                    .as_ref()
                    .map(|component| component.build(inputs, None))
                    .transpose()?;
                let mut string = StringRanking::new(
                    start_states.clone(),
                    end_states.clone(),
                    *n_paths,
                    statistical,
                    pathways,
                );
                string.policy.maximize = *maximize;
                Strategy::String(string)
            }
        };
        if let Some(policy) = strategy.policy_mut() {
            policy.diversity = diversity;
        }
        Ok(strategy)
    }
}

fn default_master_seed() -> u64 {
    0x0FA5_7C0D_E5EE_D000_u64
}

/// Master seed from which every round's RNG is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed for the whole sampling campaign.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label copied into every round outcome.
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Top-level configuration for one adaptive sampling campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Ranking strategy.
    pub strategy: StrategyConfig,
    /// Batch size selected every round.
    pub n_clones: usize,
    /// Diversified selection settings, used when a distance metric is supplied.
    #[serde(default)]
    pub spreading: SpreadingOpts,
    /// Seeding policy.
    #[serde(default)]
    pub seed: SeedPolicy,
}

impl SamplingConfig {
    /// Parses a YAML configuration.
    pub fn from_yaml_str(data: &str) -> Result<Self, FastError> {
        serde_yaml::from_str(data).map_err(|err| serde_error("yaml_deserialize", err))
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, FastError> {
        serde_yaml::to_string(self).map_err(|err| serde_error("yaml_serialize", err))
    }

    /// Parses a JSON configuration.
    pub fn from_json_str(data: &str) -> Result<Self, FastError> {
        serde_json::from_str(data).map_err(|err| serde_error("json_deserialize", err))
    }

    /// Builds the configured strategy.
    ///
    /// Diversified selection is enabled exactly when `inputs.distance` is set.
    pub fn build_strategy(&self, inputs: &StrategyInputs) -> Result<Strategy, FastError> {
        let diversity = inputs.distance.clone().map(|metric| Diversity {
            metric,
            opts: self.spreading,
        });
        self.strategy.build(inputs, diversity)
    }
}
