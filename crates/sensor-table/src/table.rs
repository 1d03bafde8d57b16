//! Column-Oriented Observation Table

use crate::{Cell, TableError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Entity identifier read from a group-key column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    /// Numeric id (e.g. engine number)
    Int(i64),
    /// Textual id (e.g. serial number)
    Text(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Int(id) => write!(f, "{}", id),
            EntityKey::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Typed storage for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Integer values (ids, cycles, counts)
    Int(Vec<i64>),
    /// Real values with validity tags
    Float(Vec<Cell>),
    /// Text values (ids only)
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    /// Check if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column; `None` for text
    pub fn to_cells(&self) -> Option<Vec<Cell>> {
        match self {
            ColumnData::Int(v) => Some(v.iter().map(|&x| Cell::Value(x as f64)).collect()),
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Text(_) => None,
        }
    }

    fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Int(v) => ColumnData::Int(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Float(v) => ColumnData::Float(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Text(v) => ColumnData::Text(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }
}

/// Named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within a table
    pub name: String,
    /// Column values
    pub data: ColumnData,
}

impl Column {
    /// Create a named column
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// In-memory observation table with equal-length named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Create a table, checking names are unique and lengths agree
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map_or(0, |c| c.data.len());
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.data.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: rows,
                    actual: column.data.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Start building a table column by column
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Numeric cells of a column (integers are widened)
    pub fn numeric(&self, name: &str) -> Result<Vec<Cell>, TableError> {
        self.column(name)?
            .data
            .to_cells()
            .ok_or_else(|| TableError::NotNumeric(name.to_string()))
    }

    /// Entity key of every row
    pub fn entity_keys(&self, key: &str) -> Result<Vec<EntityKey>, TableError> {
        match &self.column(key)?.data {
            ColumnData::Int(v) => Ok(v.iter().copied().map(EntityKey::Int).collect()),
            ColumnData::Text(v) => Ok(v.iter().cloned().map(EntityKey::Text).collect()),
            ColumnData::Float(_) => Err(TableError::UnsupportedKey(key.to_string())),
        }
    }

    /// Row indices of each entity, in order of first appearance.
    ///
    /// Rows of one entity need not be contiguous; indices within a group
    /// keep table order.
    pub fn groups(&self, key: &str) -> Result<Vec<(EntityKey, Vec<usize>)>, TableError> {
        let keys = self.entity_keys(key)?;
        let mut slots: HashMap<EntityKey, usize> = HashMap::new();
        let mut groups: Vec<(EntityKey, Vec<usize>)> = Vec::new();

        for (row, entity) in keys.into_iter().enumerate() {
            match slots.get(&entity) {
                Some(&slot) => groups[slot].1.push(row),
                None => {
                    slots.insert(entity.clone(), groups.len());
                    groups.push((entity, vec![row]));
                }
            }
        }

        Ok(groups)
    }

    /// Replace a column with float cells in place, or append it
    pub fn set_float(&mut self, name: impl Into<String>, cells: Vec<Cell>) -> Result<(), TableError> {
        let name = name.into();
        if self.columns.is_empty() {
            self.rows = cells.len();
        } else if cells.len() != self.rows {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.rows,
                actual: cells.len(),
            });
        }

        let data = ColumnData::Float(cells);
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.data = data,
            None => self.columns.push(Column { name, data }),
        }
        Ok(())
    }

    /// Mutable access to every float cell in the table
    pub fn float_cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> + '_ {
        self.columns
            .iter_mut()
            .filter_map(|column| match &mut column.data {
                ColumnData::Float(cells) => Some(cells.iter_mut()),
                _ => None,
            })
            .flatten()
    }

    /// Count float cells that are missing or warming up
    pub fn count_undefined(&self) -> usize {
        self.columns
            .iter()
            .map(|column| match &column.data {
                ColumnData::Float(cells) => cells.iter().filter(|c| !c.is_defined()).count(),
                _ => 0,
            })
            .sum()
    }

    /// New table holding the given rows, in the given order
    pub fn take_rows(&self, rows: &[usize]) -> Result<Table, TableError> {
        if let Some(&row) = rows.iter().find(|&&r| r >= self.rows) {
            return Err(TableError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
                .collect(),
            rows: rows.len(),
        })
    }

    /// Verify each entity's rows are in non-decreasing cycle order
    pub fn check_cycle_order(&self, key: &str, cycle: &str) -> Result<(), TableError> {
        let cycles = self.numeric(cycle)?;
        for (entity, rows) in self.groups(key)? {
            let mut previous: Option<f64> = None;
            for &row in &rows {
                let Some(current) = cycles[row].value() else {
                    continue;
                };
                if let Some(prev) = previous {
                    if current < prev {
                        return Err(TableError::CycleOrder {
                            entity,
                            row,
                            previous: prev,
                            cycle: current,
                        });
                    }
                }
                previous = Some(current);
            }
        }
        Ok(())
    }
}

/// Incremental table constructor
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Add an integer column
    pub fn int(mut self, name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        self.columns
            .push(Column::new(name, ColumnData::Int(values.into_iter().collect())));
        self
    }

    /// Add a float column; NaN values become missing cells
    pub fn float(mut self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        self.columns.push(Column::new(
            name,
            ColumnData::Float(values.into_iter().map(Cell::from_f64).collect()),
        ));
        self
    }

    /// Add a float column from explicit cells
    pub fn cells(mut self, name: impl Into<String>, values: impl IntoIterator<Item = Cell>) -> Self {
        self.columns
            .push(Column::new(name, ColumnData::Float(values.into_iter().collect())));
        self
    }

    /// Add a text column
    pub fn text<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.columns.push(Column::new(
            name,
            ColumnData::Text(values.into_iter().map(Into::into).collect()),
        ));
        self
    }

    /// Validate and build the table
    pub fn build(self) -> Result<Table, TableError> {
        Table::new(self.columns)
    }
}
