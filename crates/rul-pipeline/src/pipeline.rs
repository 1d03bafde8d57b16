//! Feature Pipeline

use crate::config::PipelineConfig;
use crate::PipelineError;
use baseline_normalizer::BaselineNormalizer;
use feature_engine::RollingFeatureGenerator;
use inference_engine::{predict_rul, ModelHandle};
use sensor_table::Table;
use tracing::{debug, info};

/// Normalizes, featurizes and scores an observation table
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: PipelineConfig,
    normalizer: BaselineNormalizer,
    generator: RollingFeatureGenerator,
}

impl FeaturePipeline {
    /// Create a pipeline from validated settings
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        info!("Creating feature pipeline with config: {:?}", config);

        let normalizer = BaselineNormalizer::new()
            .with_cycle_column(config.cycle_column.clone())
            .strict(config.strict_baseline);
        let generator = RollingFeatureGenerator::new(config.rolling_windows.clone())?
            .with_fill(config.fill_policy);

        Ok(Self {
            config,
            normalizer,
            generator,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Feature columns produced for the model: normalized sensors, then derived columns
    pub fn feature_columns(&self) -> Vec<String> {
        let mut columns = self.config.sensors.clone();
        columns.extend(self.generator.feature_names(&self.config.sensors));
        columns
    }

    /// Baseline-normalize the sensors, then append rolling features
    pub fn transform(&self, table: &Table) -> Result<Table, PipelineError> {
        let config = &self.config;
        table.check_cycle_order(&config.group_key, &config.cycle_column)?;

        let normalized = self.normalizer.normalize(
            table,
            &config.sensors,
            &config.group_key,
            config.baseline_window,
        )?;
        let features = self
            .generator
            .generate(&normalized, &config.sensors, &config.group_key)?;

        debug!(
            "Pipeline produced {} rows x {} columns",
            features.num_rows(),
            features.num_columns()
        );
        Ok(features)
    }

    /// Transform the table and predict remaining useful life per row
    pub fn predict(&self, model: &ModelHandle, table: &Table) -> Result<Vec<f64>, PipelineError> {
        let features = self.transform(table)?;
        Ok(predict_rul(model, &features)?)
    }
}
