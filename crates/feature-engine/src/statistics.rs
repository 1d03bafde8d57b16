//! Trailing-Window Statistics

use sensor_table::Cell;

/// Statistics over the defined cells of one trailing window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStatistics {
    /// Mean of defined cells
    pub mean: Option<f64>,
    /// Sample standard deviation of defined cells
    pub std_dev: Option<f64>,
    /// Number of defined cells
    pub count: usize,
    /// Number of rows in the window, defined or not
    pub span: usize,
}

impl WindowStatistics {
    /// Compute statistics from a window of cells
    pub fn compute(window: &[Cell]) -> Self {
        let values: Vec<f64> = window.iter().filter_map(|c| c.value()).collect();
        let span = window.len();
        let count = values.len();
        if count == 0 {
            return Self {
                span,
                ..Self::default()
            };
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std_dev = if count < 2 {
            None
        } else if values.iter().all(|&v| v == values[0]) {
            Some(0.0)
        } else {
            let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            Some((m2 / (n - 1.0)).sqrt())
        };

        Self {
            mean: Some(mean),
            std_dev,
            count,
            span,
        }
    }

    /// Mean as a cell; missing when nothing in the window is defined
    pub fn mean_cell(&self) -> Cell {
        self.mean.map_or(Cell::Missing, Cell::Value)
    }

    /// Standard deviation as a cell.
    ///
    /// A window shorter than two rows is warming up; a full enough window
    /// with fewer than two defined values is missing data.
    pub fn std_cell(&self) -> Cell {
        if self.span < 2 {
            return Cell::Warmup;
        }
        self.std_dev.map_or(Cell::Missing, Cell::Value)
    }
}

/// Finite-difference slope over `lag` rows; `None` when no lagged row exists
pub fn slope(current: Cell, lagged: Option<Cell>, lag: usize) -> Cell {
    let Some(lagged) = lagged else {
        return Cell::Warmup;
    };
    match (current.value(), lagged.value()) {
        (Some(now), Some(then)) => Cell::from_f64((now - then) / lag as f64),
        _ => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[f64]) -> Vec<Cell> {
        values.iter().copied().map(Cell::from_f64).collect()
    }

    #[test]
    fn test_mean_computation() {
        let stats = WindowStatistics::compute(&cells(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert!((stats.mean.unwrap() - 3.0).abs() < 0.001);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_std_dev_computation() {
        let stats = WindowStatistics::compute(&cells(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]));
        // sample std: sqrt(32 / 7)
        assert!((stats.std_dev.unwrap() - 2.138).abs() < 0.001);
    }

    #[test]
    fn test_single_row_is_warmup() {
        let stats = WindowStatistics::compute(&cells(&[4.0]));
        assert_eq!(stats.mean_cell(), Cell::Value(4.0));
        assert_eq!(stats.std_cell(), Cell::Warmup);
    }

    #[test]
    fn test_gaps_are_missing() {
        let stats = WindowStatistics::compute(&[Cell::Missing, Cell::Value(2.0), Cell::Missing]);
        assert_eq!(stats.mean_cell(), Cell::Value(2.0));
        assert_eq!(stats.std_cell(), Cell::Missing);

        let empty = WindowStatistics::compute(&[Cell::Missing, Cell::Missing]);
        assert_eq!(empty.mean_cell(), Cell::Missing);
    }

    #[test]
    fn test_constant_window_has_zero_std() {
        let stats = WindowStatistics::compute(&cells(&[0.3, 0.3, 0.3]));
        assert_eq!(stats.std_cell(), Cell::Value(0.0));
    }

    #[test]
    fn test_slope() {
        assert_eq!(slope(Cell::Value(9.0), Some(Cell::Value(3.0)), 3), Cell::Value(2.0));
        assert_eq!(slope(Cell::Value(9.0), None, 3), Cell::Warmup);
        assert_eq!(slope(Cell::Missing, Some(Cell::Value(3.0)), 3), Cell::Missing);
    }
}
