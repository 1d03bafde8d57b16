//! Pipeline configuration

use crate::PipelineError;
use baseline_normalizer::{DEFAULT_CYCLE_COLUMN, DEFAULT_HEALTHY_WINDOW};
use feature_engine::{FillPolicy, DEFAULT_WINDOWS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for overrides, e.g. `RUL_BASELINE_WINDOW=30`
pub const ENV_PREFIX: &str = "RUL";

/// Feature pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column identifying the entity (engine, unit)
    pub group_key: String,

    /// Column holding the per-entity cycle index
    pub cycle_column: String,

    /// Sensor columns to normalize and featurize
    pub sensors: Vec<String>,

    /// Number of initial cycles treated as healthy
    pub baseline_window: u32,

    /// Rolling window sizes (rows)
    pub rolling_windows: Vec<usize>,

    /// Reject entities without a usable healthy baseline
    pub strict_baseline: bool,

    /// Undefined-value handling at the output boundary
    pub fill_policy: FillPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            group_key: "engine_id".to_string(),
            cycle_column: DEFAULT_CYCLE_COLUMN.to_string(),
            sensors: Vec::new(),
            baseline_window: DEFAULT_HEALTHY_WINDOW,
            rolling_windows: DEFAULT_WINDOWS.to_vec(),
            strict_baseline: false,
            fill_policy: FillPolicy::ZeroAll,
        }
    }
}

impl PipelineConfig {
    /// Default settings for the given sensors
    pub fn for_sensors<S: Into<String>>(sensors: impl IntoIterator<Item = S>) -> Self {
        Self {
            sensors: sensors.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Load from a file (format by extension) with `RUL_*` overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load from a file with overrides from `{prefix}_*` environment variables
    pub fn load_with_prefix(path: impl AsRef<Path>, prefix: &str) -> Result<Self, PipelineError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(
                ::config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("sensors")
                    .with_list_parse_key("rolling_windows"),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.group_key.is_empty() || self.cycle_column.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "group_key and cycle_column must be set".to_string(),
            ));
        }
        if self.sensors.is_empty() {
            return Err(PipelineError::InvalidConfig("no sensors configured".to_string()));
        }
        if self.baseline_window == 0 {
            return Err(PipelineError::InvalidConfig(
                "baseline_window must be positive".to_string(),
            ));
        }
        if self.rolling_windows.is_empty() || self.rolling_windows.contains(&0) {
            return Err(PipelineError::InvalidConfig(format!(
                "rolling_windows must be non-empty and positive, got {:?}",
                self.rolling_windows
            )));
        }
        Ok(())
    }
}
