//! Per-Entity Baseline Normalizer

use crate::baseline::BaselineStats;
use crate::error::NormalizationError;
use sensor_table::{Cell, EntityKey, Table};
use tracing::{debug, warn};

/// Default name of the per-entity time-step column
pub const DEFAULT_CYCLE_COLUMN: &str = "cycle";

/// Default number of initial cycles treated as healthy
pub const DEFAULT_HEALTHY_WINDOW: u32 = 20;

/// Normalizes sensor columns against each entity's healthy window
#[derive(Debug, Clone)]
pub struct BaselineNormalizer {
    /// Column holding the cycle index
    cycle_column: String,
    /// Fail instead of emitting missing values when a baseline is undefined
    strict: bool,
}

impl Default for BaselineNormalizer {
    fn default() -> Self {
        Self {
            cycle_column: DEFAULT_CYCLE_COLUMN.to_string(),
            strict: false,
        }
    }
}

impl BaselineNormalizer {
    /// Create a lenient normalizer reading cycles from `cycle`
    pub fn new() -> Self {
        Self::default()
    }

    /// Read cycles from a different column
    pub fn with_cycle_column(mut self, name: impl Into<String>) -> Self {
        self.cycle_column = name.into();
        self
    }

    /// Toggle strict mode
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Cycle column in use
    pub fn cycle_column(&self) -> &str {
        &self.cycle_column
    }

    /// Whether undefined baselines are errors
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Baseline statistics of one sensor for every entity in the table.
    ///
    /// Entities with no rows inside the window are listed with empty stats.
    pub fn baselines(
        &self,
        table: &Table,
        sensor: &str,
        group_key: &str,
        window: u32,
    ) -> Result<Vec<(EntityKey, BaselineStats)>, NormalizationError> {
        if window == 0 {
            return Err(NormalizationError::InvalidWindow(window));
        }
        let cycles = table.numeric(&self.cycle_column)?;
        let values = table.numeric(sensor)?;

        Ok(table
            .groups(group_key)?
            .into_iter()
            .map(|(entity, rows)| {
                let stats = healthy_stats(&rows, &cycles, &values, window);
                (entity, stats)
            })
            .collect())
    }

    /// Z-score each listed sensor against its entity's healthy baseline.
    ///
    /// Returns a new table with the same rows and columns; only the sensor
    /// columns change.
    pub fn normalize<S: AsRef<str>>(
        &self,
        table: &Table,
        sensors: &[S],
        group_key: &str,
        window: u32,
    ) -> Result<Table, NormalizationError> {
        if window == 0 {
            return Err(NormalizationError::InvalidWindow(window));
        }

        // Fail on schema problems before touching any column
        let cycles = table.numeric(&self.cycle_column)?;
        let groups = table.groups(group_key)?;
        for sensor in sensors {
            table.numeric(sensor.as_ref())?;
        }

        debug!(
            "Normalizing {} sensors over {} entities (window={}, rows={})",
            sensors.len(),
            groups.len(),
            window,
            table.num_rows()
        );

        let mut output = table.clone();
        for sensor in sensors {
            let sensor = sensor.as_ref();
            let values = output.numeric(sensor)?;
            let mut normalized = vec![Cell::Missing; values.len()];

            for (entity, rows) in &groups {
                let stats = healthy_stats(rows, &cycles, &values, window);
                if !stats.is_defined() {
                    if self.strict {
                        return Err(NormalizationError::UndefinedBaseline {
                            sensor: sensor.to_string(),
                            entity: entity.clone(),
                            healthy_rows: stats.count,
                        });
                    }
                    warn!(
                        "Sensor {}: entity {} has {} healthy values, rows left undefined",
                        sensor, entity, stats.count
                    );
                }
                for &row in rows {
                    normalized[row] = stats.apply(values[row]);
                }
            }

            output.set_float(sensor, normalized)?;
        }

        Ok(output)
    }
}

/// Normalize with the default cycle column in lenient mode
pub fn normalize<S: AsRef<str>>(
    table: &Table,
    sensors: &[S],
    group_key: &str,
    window: u32,
) -> Result<Table, NormalizationError> {
    BaselineNormalizer::default().normalize(table, sensors, group_key, window)
}

fn healthy_stats(rows: &[usize], cycles: &[Cell], values: &[Cell], window: u32) -> BaselineStats {
    let limit = f64::from(window);
    let healthy: Vec<f64> = rows
        .iter()
        .filter(|&&row| cycles[row].value().is_some_and(|c| c <= limit))
        .filter_map(|&row| values[row].value())
        .collect();
    BaselineStats::compute(&healthy)
}
