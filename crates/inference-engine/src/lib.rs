//! RUL Inference Engine
//!
//! Loads pre-trained regression models and applies them to feature
//! matrices, one prediction per row.

mod engine;
mod manifest;
mod matrix;
mod regressor;

pub use engine::{load_model, predict, predict_rul, ModelHandle};
pub use manifest::{ModelManifest, ModelSpec};
pub use matrix::FeatureMatrix;
pub use regressor::{LinearRegressor, OnnxRegressor, Regressor};

use sensor_table::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed for {}: {reason}", path.display())]
    ModelLoadError { path: PathBuf, reason: String },
    #[error("Feature schema mismatch: expected {expected:?}, got {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Feature {column} is undefined at row {row}")]
    UndefinedFeature { column: String, row: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error(transparent)]
    Table(#[from] TableError),
}
