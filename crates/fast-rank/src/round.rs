//! Sampling rounds driven by a configuration.

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::{derive_substream_seed, MsmSnapshot, RngHandle};
use serde::{Deserialize, Serialize};

use crate::config::{SamplingConfig, StrategyInputs};
use crate::ranking::Ranking;
use crate::strategy::Strategy;

/// Ranking and batch produced by one adaptive sampling round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Zero-based round index.
    pub round: u64,
    /// Seed of the RNG used for this round.
    pub seed: u64,
    /// Name of the strategy that produced the batch.
    pub strategy: String,
    /// Label copied from the seed policy.
    #[serde(default)]
    pub label: Option<String>,
    /// Ranking over discovered states, absent when selection fell back to
    /// evens before ranking.
    pub ranking: Option<Ranking>,
    /// Exactly `n_clones` state indices.
    pub selection: Vec<usize>,
}

/// Configured strategy plus the settings needed to run numbered rounds.
#[derive(Debug)]
pub struct AdaptiveSampler {
    config: SamplingConfig,
    strategy: Strategy,
}

impl AdaptiveSampler {
    /// Builds the strategy described by `config`.
    pub fn new(config: SamplingConfig, inputs: &StrategyInputs) -> Result<Self, FastError> {
        let strategy = config.build_strategy(inputs)?;
        Ok(Self { config, strategy })
    }

    /// Configuration in use.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Strategy in use.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Ranks the snapshot and selects the next batch for `round`.
    ///
    /// The round's RNG is derived from the master seed and `round`, so the
    /// outcome depends only on the snapshot, the configuration and `round`.
    pub fn plan_round(&self, msm: &dyn MsmSnapshot, round: u64) -> Result<RoundOutcome, FastError> {
        let master_seed = self.config.seed.master_seed;
        let seed = derive_substream_seed(master_seed, round);
        let mut rng = RngHandle::for_substream(master_seed, round);
        let (ranking, selection) =
            self.strategy
                .rank_and_select(msm, self.config.n_clones, &mut rng)?;
        if selection.len() != self.config.n_clones {
            return Err(FastError::Validation(
                ErrorInfo::new("short-batch", "selection did not fill the batch")
                    .with_context("requested", self.config.n_clones)
                    .with_context("selected", selection.len()),
            ));
        }
        Ok(RoundOutcome {
            round,
            seed,
            strategy: self.strategy.name().to_string(),
            label: self.config.seed.label.clone(),
            ranking,
            selection,
        })
    }
}
