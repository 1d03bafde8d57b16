//! Feature Engineering Engine
//!
//! Provides per-entity rolling statistics and trend features over sensor
//! columns of an observation table.

mod features;
mod fill;
mod statistics;

pub use features::{add_rolling_features, feature_names, RollingFeatureGenerator, DEFAULT_WINDOWS};
pub use fill::{fill_undefined, FillPolicy};
pub use statistics::{slope, WindowStatistics};

use sensor_table::TableError;
use thiserror::Error;

/// Errors during feature generation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error(transparent)]
    Schema(#[from] TableError),
    #[error("Rolling windows must be non-empty and positive, got {0:?}")]
    InvalidWindow(Vec<usize>),
}
