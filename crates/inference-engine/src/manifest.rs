//! Model Manifest
//!
//! A model artifact is a JSON manifest naming the feature columns the model
//! was trained on and describing the regressor:
//!
//! ```json
//! { "features": ["s1", "s1_mean_5"],
//!   "model": { "type": "onnx", "path": "rul.onnx" } }
//! ```

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Regressor description inside a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    /// `intercept + coefficients . features`
    Linear { intercept: f64, coefficients: Vec<f64> },
    /// ONNX graph; relative paths resolve against the manifest directory
    Onnx { path: PathBuf },
}

/// Parsed model manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Optional human-readable model name
    #[serde(default)]
    pub name: Option<String>,
    /// Feature columns in training order
    pub features: Vec<String>,
    /// Regressor definition
    pub model: ModelSpec,
}

impl ModelManifest {
    /// Read and validate a manifest file
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let load_error = |reason: String| InferenceError::ModelLoadError {
            path: path.to_path_buf(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let manifest: ModelManifest =
            serde_json::from_str(&raw).map_err(|e| load_error(format!("invalid manifest: {}", e)))?;
        manifest.validate().map_err(load_error)?;
        Ok(manifest)
    }

    /// Check the manifest is structurally usable
    pub fn validate(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err("manifest lists no features".to_string());
        }
        if let ModelSpec::Linear { coefficients, .. } = &self.model {
            if coefficients.len() != self.features.len() {
                return Err(format!(
                    "{} coefficients for {} features",
                    coefficients.len(),
                    self.features.len()
                ));
            }
        }
        Ok(())
    }

    /// ONNX path resolved against the manifest location
    pub fn resolve(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.parent().unwrap_or_else(|| Path::new(".")).join(relative)
        }
    }
}
