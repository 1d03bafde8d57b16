//! Sensor Observation Table
//!
//! Provides the in-memory, column-oriented table that every feature stage
//! reads from and produces. Rows are keyed by `(entity, cycle)`.

mod cell;
mod table;

pub use cell::Cell;
pub use table::{Column, ColumnData, EntityKey, Table, TableBuilder};

use thiserror::Error;

/// Schema and shape errors raised by table operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Referenced column does not exist
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two columns share a name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Column length differs from the table's row count
    #[error("Column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Row index past the end of the table
    #[error("Row {row} out of range for a table of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    /// Column holds text where numbers are required
    #[error("Column {0} is not numeric")]
    NotNumeric(String),

    /// Column cannot identify entities (float keys are not hashable)
    #[error("Column {0} cannot be used as a group key")]
    UnsupportedKey(String),

    /// Entity rows are not in non-decreasing cycle order
    #[error("Entity {entity}: cycle {cycle} at row {row} follows cycle {previous}")]
    CycleOrder {
        entity: EntityKey,
        row: usize,
        previous: f64,
        cycle: f64,
    },
}
