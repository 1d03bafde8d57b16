//! Healthy-Baseline Normalization
//!
//! Rescales sensor columns to z-scores against each entity's own statistics
//! over its first `window` cycles.

mod baseline;
mod error;
mod normalizer;

pub use baseline::BaselineStats;
pub use error::NormalizationError;
pub use normalizer::{normalize, BaselineNormalizer, DEFAULT_CYCLE_COLUMN, DEFAULT_HEALTHY_WINDOW};
