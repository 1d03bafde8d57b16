//! Validity-Tagged Numeric Cell

use serde::{Deserialize, Serialize};

/// A numeric cell that keeps "not enough history" apart from missing data
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// A defined reading or statistic
    Value(f64),
    /// Source data absent or undefined
    #[default]
    Missing,
    /// Rolling statistic without enough trailing rows yet
    Warmup,
}

impl Cell {
    /// Wrap a float, mapping NaN to `Missing`
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Value(value)
        }
    }

    /// Defined value, if any
    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    /// Whether the cell holds a usable number
    pub fn is_defined(self) -> bool {
        self.value().is_some()
    }

    /// Whether the cell is a cold-start placeholder
    pub fn is_warmup(self) -> bool {
        matches!(self, Cell::Warmup)
    }

    /// Defined value, or 0.0 for anything undefined
    pub fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_f64(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::from_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_becomes_missing() {
        assert_eq!(Cell::from_f64(f64::NAN), Cell::Missing);
        assert_eq!(Cell::from(Some(f64::NAN)), Cell::Missing);
        assert_eq!(Cell::from(None), Cell::Missing);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Cell::Value(2.5).value(), Some(2.5));
        assert!(Cell::Value(f64::INFINITY).is_defined());
        assert!(!Cell::Value(f64::NAN).is_defined());
        assert!(!Cell::Warmup.is_defined());
        assert!(Cell::Warmup.is_warmup());
        assert_eq!(Cell::Missing.or_zero(), 0.0);
        assert_eq!(Cell::Value(-3.0).or_zero(), -3.0);
    }

    #[test]
    fn test_serde_tagging() {
        let cells = vec![Cell::Value(1.5), Cell::Missing, Cell::Warmup];
        let json = serde_json::to_string(&cells).unwrap();
        let back: Vec<Cell> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }
}
