//! Model Loading and Prediction

use crate::manifest::{ModelManifest, ModelSpec};
use crate::matrix::FeatureMatrix;
use crate::regressor::{LinearRegressor, OnnxRegressor, Regressor};
use crate::InferenceError;
use sensor_table::Table;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A loaded model together with the feature schema it was trained on
pub struct ModelHandle {
    /// Display name
    name: String,
    /// Feature columns in training order
    features: Vec<String>,
    /// Backend that scores rows
    regressor: Box<dyn Regressor>,
    /// Manifest the model came from, if any
    source: Option<PathBuf>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("kind", &self.regressor.kind())
            .field("features", &self.features)
            .field("source", &self.source)
            .finish()
    }
}

impl ModelHandle {
    /// Wrap an in-memory regressor
    pub fn new(
        name: impl Into<String>,
        features: Vec<String>,
        regressor: Box<dyn Regressor>,
    ) -> Self {
        Self {
            name: name.into(),
            features,
            regressor,
            source: None,
        }
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expected feature columns, in order
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Backend kind (`linear`, `onnx`)
    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    /// Manifest path, when loaded from disk
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Load a model from its JSON manifest
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelHandle, InferenceError> {
    let path = path.as_ref();
    info!("Loading model manifest: {}", path.display());

    let manifest = ModelManifest::from_path(path)?;
    let regressor: Box<dyn Regressor> = match &manifest.model {
        ModelSpec::Linear {
            intercept,
            coefficients,
        } => Box::new(LinearRegressor::new(*intercept, coefficients.clone())),
        ModelSpec::Onnx { path: onnx } => {
            let onnx = ModelManifest::resolve(path, onnx);
            let regressor = OnnxRegressor::load(&onnx)?;
            match regressor.input_width() {
                Some(width) if width != manifest.features.len() => {
                    return Err(InferenceError::ModelLoadError {
                        path: onnx,
                        reason: format!(
                            "graph input takes {} features, manifest lists {}",
                            width,
                            manifest.features.len()
                        ),
                    });
                }
                _ => Box::new(regressor),
            }
        }
    };

    let name = manifest.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string())
    });
    info!(
        "Model {} loaded: kind={}, features={}",
        name,
        regressor.kind(),
        manifest.features.len()
    );

    Ok(ModelHandle {
        name,
        features: manifest.features,
        regressor,
        source: Some(path.to_path_buf()),
    })
}

/// Predict one value per matrix row, in row order
pub fn predict(model: &ModelHandle, matrix: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
    if matrix.columns() != model.features() {
        return Err(InferenceError::SchemaMismatch {
            expected: model.features.clone(),
            actual: matrix.columns().to_vec(),
        });
    }

    let start = std::time::Instant::now();
    let predictions = model.regressor.predict(matrix.values())?;
    debug!(
        "Inference completed in {}ms ({} rows)",
        start.elapsed().as_millis(),
        predictions.len()
    );
    Ok(predictions)
}

/// Select the model's features from a table and predict remaining useful life
pub fn predict_rul(model: &ModelHandle, table: &Table) -> Result<Vec<f64>, InferenceError> {
    let matrix = FeatureMatrix::from_table(table, model.features())?;
    predict(model, &matrix)
}
