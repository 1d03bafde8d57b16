//! RUL Feature Pipeline
//!
//! Wires the stages together: raw table → baseline normalization → rolling
//! features → model predictions, driven by a single configuration.

mod config;
mod pipeline;

pub use crate::config::PipelineConfig;
pub use pipeline::FeaturePipeline;

use baseline_normalizer::NormalizationError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use sensor_table::TableError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Errors raised by the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration load failed: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error(transparent)]
    Features(#[from] FeatureError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Initialize logging
pub fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
