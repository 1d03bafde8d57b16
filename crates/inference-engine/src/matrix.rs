//! Dense Feature Matrix

use crate::InferenceError;
use ndarray::Array2;
use sensor_table::Table;

/// Row-major feature matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Wrap an array whose width matches the column names
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self, InferenceError> {
        if values.ncols() != columns.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{} columns", columns.len()),
                actual: format!("{} columns", values.ncols()),
            });
        }
        Ok(Self { columns, values })
    }

    /// Select columns from a table; every selected cell must be defined
    pub fn from_table<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Self, InferenceError> {
        let mut data = Vec::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref();
            let cells = table.numeric(name)?;
            let mut values = Vec::with_capacity(cells.len());
            for (row, cell) in cells.into_iter().enumerate() {
                let value = cell.value().ok_or_else(|| InferenceError::UndefinedFeature {
                    column: name.to_string(),
                    row,
                })?;
                values.push(value);
            }
            data.push(values);
        }

        let values = Array2::from_shape_fn((table.num_rows(), columns.len()), |(r, c)| data[c][r]);
        Ok(Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            values,
        })
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Underlying values
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.values.ncols()
    }
}
