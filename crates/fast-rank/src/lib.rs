#![deny(missing_docs)]

//! State ranking and batch selection for MSM-driven adaptive sampling.

pub mod adjacency;
pub mod config;
pub mod distance;
pub mod pagerank;
pub mod ranking;
pub mod round;
pub mod select;
pub mod spreading;
pub mod strategy;

pub use adjacency::build_adjacency;
pub use config::{
    FastWeights, PageRankOpts, SamplingConfig, ScalingConfig, SeedPolicy, SpreadingOpts,
    StrategyConfig, StrategyInputs,
};
pub use distance::{euclidean, CenterCoordinates, DistanceLookup, DistanceMetric};
pub use pagerank::{rank_adjacency, NORMALIZED_TOTAL};
pub use ranking::Ranking;
pub use round::{AdaptiveSampler, RoundOutcome};
pub use select::{select_evens, select_top};
pub use spreading::select_spreading;
pub use strategy::{
    Counts, Diversity, FastRanking, PageRanking, SelectionPolicy, Strategy, StringRanking,
};
