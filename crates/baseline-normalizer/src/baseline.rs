//! Baseline Statistics

use sensor_table::Cell;

/// Mean and sample standard deviation of an entity's healthy readings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BaselineStats {
    /// Mean of the defined healthy values
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); needs two values
    pub std: Option<f64>,
    /// Number of defined healthy values
    pub count: usize,
}

impl BaselineStats {
    /// Compute statistics over defined values.
    ///
    /// A non-finite mean or std (infinite readings, overflow) is reported as
    /// undefined.
    pub fn compute(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        if !mean.is_finite() {
            return Self {
                count,
                ..Self::default()
            };
        }
        if count < 2 {
            return Self {
                mean: Some(mean),
                std: None,
                count,
            };
        }

        // Constant readings must give an exact zero so the fallback scale applies
        let std = if values.iter().all(|&v| v == values[0]) {
            0.0
        } else {
            let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (m2 / (count - 1) as f64).sqrt()
        };

        Self {
            mean: Some(mean),
            std: std.is_finite().then_some(std),
            count,
        }
    }

    /// Both mean and standard deviation are available
    pub fn is_defined(&self) -> bool {
        self.mean.is_some() && self.std.is_some()
    }

    /// Divisor used for scaling: the std, or 1 when the std is zero
    pub fn scale(&self) -> Option<f64> {
        self.std.map(|s| if s == 0.0 { 1.0 } else { s })
    }

    /// Z-score a single cell against this baseline
    pub fn apply(&self, cell: Cell) -> Cell {
        match (cell.value(), self.mean, self.scale()) {
            (Some(v), Some(mean), Some(scale)) => Cell::from_f64((v - mean) / scale),
            _ => Cell::Missing,
        }
    }
}
