//! Rolling Feature Generation

use crate::fill::{fill_undefined, FillPolicy};
use crate::statistics::{slope, WindowStatistics};
use crate::FeatureError;
use sensor_table::{Cell, Table};
use tracing::{debug, info};

/// Window sizes used when none are configured
pub const DEFAULT_WINDOWS: [usize; 3] = [5, 10, 20];

/// Derived column names in the order they are appended
pub fn feature_names<S: AsRef<str>>(sensors: &[S], windows: &[usize]) -> Vec<String> {
    let mut names = Vec::with_capacity(sensors.len() * windows.len() * 3);
    for sensor in sensors {
        let sensor = sensor.as_ref();
        for w in windows {
            names.push(format!("{}_mean_{}", sensor, w));
            names.push(format!("{}_std_{}", sensor, w));
            names.push(format!("{}_slope_{}", sensor, w));
        }
    }
    names
}

/// Rolling mean, std and slope columns for one sensor and window
struct RollingColumns {
    mean: Vec<Cell>,
    std: Vec<Cell>,
    slope: Vec<Cell>,
}

impl RollingColumns {
    fn compute(values: &[Cell], groups: &[Vec<usize>], window: usize) -> Self {
        let rows = values.len();
        let mut columns = Self {
            mean: vec![Cell::Missing; rows],
            std: vec![Cell::Missing; rows],
            slope: vec![Cell::Missing; rows],
        };

        for group in groups {
            let series: Vec<Cell> = group.iter().map(|&row| values[row]).collect();
            for (i, &row) in group.iter().enumerate() {
                let start = (i + 1).saturating_sub(window);
                let stats = WindowStatistics::compute(&series[start..=i]);
                columns.mean[row] = stats.mean_cell();
                columns.std[row] = stats.std_cell();
                let lagged = i.checked_sub(window).map(|j| series[j]);
                columns.slope[row] = slope(series[i], lagged, window);
            }
        }

        columns
    }
}

/// Appends per-entity rolling statistics for each sensor and window size
#[derive(Debug, Clone)]
pub struct RollingFeatureGenerator {
    /// Trailing window sizes, in rows
    windows: Vec<usize>,
    /// Fill applied to the finished table; `None` keeps validity tags
    fill: Option<FillPolicy>,
}

impl Default for RollingFeatureGenerator {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.to_vec(),
            fill: Some(FillPolicy::ZeroAll),
        }
    }
}

impl RollingFeatureGenerator {
    /// Create a generator for the given window sizes
    pub fn new(windows: Vec<usize>) -> Result<Self, FeatureError> {
        if windows.is_empty() || windows.contains(&0) {
            return Err(FeatureError::InvalidWindow(windows));
        }
        info!("Creating rolling feature generator: windows={:?}", windows);
        Ok(Self {
            windows,
            fill: Some(FillPolicy::ZeroAll),
        })
    }

    /// Fill undefined cells with the given policy
    pub fn with_fill(mut self, policy: FillPolicy) -> Self {
        self.fill = Some(policy);
        self
    }

    /// Keep warm-up and missing tags in the output
    pub fn raw(mut self) -> Self {
        self.fill = None;
        self
    }

    /// Configured window sizes
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Names of the columns this generator appends
    pub fn feature_names<S: AsRef<str>>(&self, sensors: &[S]) -> Vec<String> {
        feature_names(sensors, &self.windows)
    }

    /// Compute rolling features; rows must already be in cycle order per entity
    pub fn generate<S: AsRef<str>>(
        &self,
        table: &Table,
        sensors: &[S],
        group_key: &str,
    ) -> Result<Table, FeatureError> {
        let groups: Vec<Vec<usize>> = table
            .groups(group_key)?
            .into_iter()
            .map(|(_, rows)| rows)
            .collect();
        for sensor in sensors {
            table.numeric(sensor.as_ref())?;
        }

        debug!(
            "Generating rolling features: sensors={}, windows={:?}, entities={}, rows={}",
            sensors.len(),
            self.windows,
            groups.len(),
            table.num_rows()
        );

        let mut output = table.clone();
        for sensor in sensors {
            let sensor = sensor.as_ref();
            let values = output.numeric(sensor)?;
            for &w in &self.windows {
                let columns = RollingColumns::compute(&values, &groups, w);
                output.set_float(format!("{}_mean_{}", sensor, w), columns.mean)?;
                output.set_float(format!("{}_std_{}", sensor, w), columns.std)?;
                output.set_float(format!("{}_slope_{}", sensor, w), columns.slope)?;
            }
        }

        Ok(match self.fill {
            Some(policy) => fill_undefined(&output, policy),
            None => output,
        })
    }
}

/// Append rolling features and zero every undefined cell
pub fn add_rolling_features<S: AsRef<str>>(
    table: &Table,
    sensors: &[S],
    windows: &[usize],
    group_key: &str,
) -> Result<Table, FeatureError> {
    RollingFeatureGenerator::new(windows.to_vec())?.generate(table, sensors, group_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_table::TableError;

    fn engine(id: i64, values: &[f64]) -> (Vec<i64>, Vec<i64>, Vec<f64>) {
        let n = values.len() as i64;
        (vec![id; values.len()], (1..=n).collect(), values.to_vec())
    }

    fn single_engine(values: &[f64]) -> Table {
        let (ids, cycles, s1) = engine(1, values);
        Table::builder()
            .int("engine_id", ids)
            .int("cycle", cycles)
            .float("s1", s1)
            .build()
            .unwrap()
    }

    fn column(table: &Table, name: &str) -> Vec<f64> {
        table
            .numeric(name)
            .unwrap()
            .into_iter()
            .map(|c| c.value().unwrap())
            .collect()
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_feature_names_order() {
        assert_eq!(
            feature_names(&["s1", "s2"], &[5]),
            vec!["s1_mean_5", "s1_std_5", "s1_slope_5", "s2_mean_5", "s2_std_5", "s2_slope_5"]
        );

        let generator = RollingFeatureGenerator::default();
        assert_eq!(generator.windows(), &DEFAULT_WINDOWS);
        assert_eq!(generator.feature_names(&["s1"])[3], "s1_mean_10");

        let generator = RollingFeatureGenerator::new(vec![30, 3]).unwrap();
        assert_eq!(generator.windows(), &[30, 3]);
        assert_eq!(generator.feature_names(&["s1"])[0], "s1_mean_30");
    }

    #[test]
    fn test_rolling_mean_std_slope() {
        let table = single_engine(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let out = add_rolling_features(&table, &["s1"], &[3], "engine_id").unwrap();

        assert!(close(&column(&out, "s1_mean_3"), &[1.0, 1.5, 2.0, 3.0, 4.0, 5.0]));
        let half = 0.5f64.sqrt();
        assert!(close(&column(&out, "s1_std_3"), &[0.0, half, 1.0, 1.0, 1.0, 1.0]));
        assert!(close(&column(&out, "s1_slope_3"), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_cold_start_slope() {
        let values: Vec<f64> = (0..25).map(|i| (i * i) as f64).collect();
        let table = single_engine(&values);
        let out = add_rolling_features(&table, &["s1"], &[5, 10, 20], "engine_id").unwrap();

        for w in [5usize, 10, 20] {
            let slopes = column(&out, &format!("s1_slope_{}", w));
            for (i, s) in slopes.iter().enumerate() {
                if i < w {
                    assert_eq!(*s, 0.0);
                } else {
                    assert!((s - (values[i] - values[i - w]) / w as f64).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_shape_preserved_and_columns_appended() {
        let table = Table::builder()
            .int("engine_id", [1, 1, 2, 2, 2])
            .int("cycle", [1, 2, 1, 2, 3])
            .float("s1", [1.0, 2.0, 3.0, 4.0, 5.0])
            .float("s2", [9.0, 8.0, 7.0, 6.0, 5.0])
            .build()
            .unwrap();
        let out = add_rolling_features(&table, &["s1", "s2"], &DEFAULT_WINDOWS, "engine_id").unwrap();

        assert_eq!(out.num_rows(), 5);
        assert_eq!(out.num_columns(), table.num_columns() + 3 * 2 * 3);
        assert_eq!(&out.column_names()[..4], &table.column_names()[..]);
        assert_eq!(out.column("s1").unwrap(), table.column("s1").unwrap());
    }

    #[test]
    fn test_full_coercion() {
        let table = Table::builder()
            .int("engine_id", [1, 1, 1, 2])
            .int("cycle", [1, 2, 3, 1])
            .float("s1", [1.0, f64::NAN, 3.0, 4.0])
            .float("other", [f64::NAN, 1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let out = add_rolling_features(&table, &["s1"], &[2], "engine_id").unwrap();
        assert_eq!(out.count_undefined(), 0);
        assert_eq!(column(&out, "other")[0], 0.0);
    }

    #[test]
    fn test_raw_output_tags_warmup_and_missing() {
        let table = single_engine(&[1.0, f64::NAN, 3.0, 5.0]);
        let out = RollingFeatureGenerator::new(vec![2])
            .unwrap()
            .raw()
            .generate(&table, &["s1"], "engine_id")
            .unwrap();

        assert_eq!(
            out.numeric("s1_std_2").unwrap(),
            vec![Cell::Warmup, Cell::Missing, Cell::Missing, Cell::Value(2.0f64.sqrt())]
        );
        assert_eq!(
            out.numeric("s1_slope_2").unwrap(),
            vec![Cell::Warmup, Cell::Warmup, Cell::Value(1.0), Cell::Missing]
        );
        assert_eq!(
            out.numeric("s1_mean_2").unwrap(),
            vec![Cell::Value(1.0), Cell::Value(1.0), Cell::Value(3.0), Cell::Value(4.0)]
        );
    }

    #[test]
    fn test_warmup_only_policy() {
        let table = single_engine(&[1.0, f64::NAN, 3.0, 5.0]);
        let out = RollingFeatureGenerator::new(vec![2])
            .unwrap()
            .with_fill(FillPolicy::WarmupOnly)
            .generate(&table, &["s1"], "engine_id")
            .unwrap();

        let slope = out.numeric("s1_slope_2").unwrap();
        assert_eq!(slope[0], Cell::Value(0.0));
        assert_eq!(slope[3], Cell::Missing);
        assert_eq!(out.numeric("s1").unwrap()[1], Cell::Missing);
    }

    #[test]
    fn test_interleaved_entities() {
        let table = Table::builder()
            .int("engine_id", [1, 2, 1, 2, 1, 2])
            .int("cycle", [1, 1, 2, 2, 3, 3])
            .float("s1", [1.0, 100.0, 2.0, 200.0, 3.0, 300.0])
            .build()
            .unwrap();
        let out = add_rolling_features(&table, &["s1"], &[2], "engine_id").unwrap();
        assert!(close(
            &column(&out, "s1_mean_2"),
            &[1.0, 100.0, 1.5, 150.0, 2.5, 250.0]
        ));
        assert!(close(
            &column(&out, "s1_slope_2"),
            &[0.0, 0.0, 0.0, 0.0, 1.0, 100.0]
        ));
    }

    #[test]
    fn test_existing_column_is_replaced() {
        let table = Table::builder()
            .int("engine_id", [1, 1])
            .float("s1", [1.0, 3.0])
            .float("s1_mean_2", [0.0, 0.0])
            .build()
            .unwrap();
        let out = add_rolling_features(&table, &["s1"], &[2], "engine_id").unwrap();
        assert_eq!(out.num_columns(), 5);
        assert_eq!(column(&out, "s1_mean_2"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_invalid_input() {
        let table = single_engine(&[1.0, 2.0]);
        assert_eq!(
            add_rolling_features(&table, &["s1"], &[], "engine_id").unwrap_err(),
            FeatureError::InvalidWindow(vec![])
        );
        assert_eq!(
            add_rolling_features(&table, &["s1"], &[5, 0], "engine_id").unwrap_err(),
            FeatureError::InvalidWindow(vec![5, 0])
        );
        assert_eq!(
            add_rolling_features(&table, &["s7"], &[5], "engine_id").unwrap_err(),
            FeatureError::Schema(TableError::MissingColumn("s7".to_string()))
        );
        assert_eq!(
            add_rolling_features(&table, &["s1"], &[5], "unit").unwrap_err(),
            FeatureError::Schema(TableError::MissingColumn("unit".to_string()))
        );
    }
}
