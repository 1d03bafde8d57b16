//! Normalization Error Types

use sensor_table::{EntityKey, TableError};
use thiserror::Error;

/// Errors during baseline normalization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    /// Sensor, cycle or group-key column missing or unusable
    #[error(transparent)]
    Schema(#[from] TableError),

    /// Healthy window must cover at least one cycle
    #[error("Healthy window must be positive, got {0}")]
    InvalidWindow(u32),

    /// Entity lacks the healthy rows needed for mean and sample std
    #[error("Sensor {sensor}: entity {entity} has no usable baseline ({healthy_rows} healthy rows)")]
    UndefinedBaseline {
        sensor: String,
        entity: EntityKey,
        healthy_rows: usize,
    },
}
