#![deny(missing_docs)]

//! Core contracts and data structures for MSM-driven adaptive sampling.

pub mod errors;
pub mod msm;
pub mod pathway;
pub mod rng;
pub mod scaling;
pub mod sparse;

pub use errors::{ErrorInfo, FastError};
pub use msm::{discovered_states, Msm, MsmSnapshot};
pub use pathway::{PathwayDecomposition, Pathways};
pub use rng::{derive_substream_seed, RngHandle};
pub use scaling::{FeatureScale, Identity, Scaling};
pub use sparse::{LinearOperator, SparseMatrix};
