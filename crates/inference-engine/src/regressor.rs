//! Regressor Backends

use crate::InferenceError;
use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tract_onnx::prelude::*;
use tract_onnx::tract_hir::infer::GenericFactoid;

/// A fitted model mapping each feature row to one value
pub trait Regressor {
    /// Short backend name for logs
    fn kind(&self) -> &'static str;

    /// Predict one value per row of `features`
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<f64>, InferenceError>;
}

/// Linear model `intercept + coefficients . x`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressor {
    intercept: f64,
    coefficients: Array1<f64>,
}

impl LinearRegressor {
    /// Create a linear model
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients: Array1::from(coefficients),
        }
    }
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<f64>, InferenceError> {
        if features.ncols() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{} columns", self.coefficients.len()),
                actual: format!("{} columns", features.ncols()),
            });
        }
        let intercept = self.intercept;
        Ok(features
            .dot(&self.coefficients)
            .mapv(|v| v + intercept)
            .to_vec())
    }
}

/// ONNX model executed with tract.
///
/// The graph takes one `f32` input of shape `[rows, features]` and yields
/// `rows` outputs; the input shape is fixed per batch before optimizing.
pub struct OnnxRegressor {
    model: InferenceModel,
    path: PathBuf,
    /// Feature count declared by the graph input, when concrete
    input_width: Option<usize>,
}

impl OnnxRegressor {
    /// Parse an ONNX file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        info!("Loading ONNX model: {}", path.display());
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| InferenceError::ModelLoadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let input_width = model.input_fact(0).ok().and_then(|fact| match fact.shape.dim(1) {
            Some(GenericFactoid::Only(dim)) => dim.as_i64().and_then(|w| usize::try_from(w).ok()),
            _ => None,
        });
        debug!("ONNX input width: {:?}", input_width);

        Ok(Self {
            model,
            path: path.to_path_buf(),
            input_width,
        })
    }

    /// Path the graph was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of features the graph input declares, if fixed
    pub fn input_width(&self) -> Option<usize> {
        self.input_width
    }
}

fn inference_failed(err: impl std::fmt::Display) -> InferenceError {
    InferenceError::InferenceFailed(err.to_string())
}

impl Regressor for OnnxRegressor {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<f64>, InferenceError> {
        let (rows, cols) = features.dim();
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_shape(&[rows, cols], &data).map_err(inference_failed)?;

        let plan = self
            .model
            .clone()
            .with_input_fact(0, f32::fact([rows, cols]).into())
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(inference_failed)?;

        let outputs = plan.run(tvec!(input.into())).map_err(inference_failed)?;
        let output = outputs
            .first()
            .ok_or_else(|| inference_failed("model produced no outputs"))?;
        let predictions: Vec<f64> = output
            .to_array_view::<f32>()
            .map_err(inference_failed)?
            .iter()
            .map(|&v| f64::from(v))
            .collect();

        if predictions.len() != rows {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{} outputs", rows),
                actual: format!("{} outputs", predictions.len()),
            });
        }
        debug!("ONNX model {} scored {} rows", self.path.display(), rows);
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_linear_predict() {
        let model = LinearRegressor::new(100.0, vec![-2.0, 0.5]);
        let out = model.predict(&array![[1.0, 2.0], [10.0, 0.0]]).unwrap();
        assert_eq!(out, vec![99.0, 80.0]);
        assert_eq!(model.kind(), "linear");
    }

    #[test]
    fn test_linear_rejects_wrong_width() {
        let model = LinearRegressor::new(0.0, vec![1.0]);
        assert!(matches!(
            model.predict(&array![[1.0, 2.0]]),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }

    #[test]
    fn test_onnx_missing_file() {
        let err = OnnxRegressor::load(Path::new("/nonexistent/rul.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError { .. }));
    }

    #[test]
    fn test_onnx_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a protobuf graph").unwrap();
        let err = OnnxRegressor::load(file.path()).err().unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError { .. }));
    }
}
