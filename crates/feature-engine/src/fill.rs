//! Undefined-Value Filling

use sensor_table::{Cell, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which undefined cells are replaced by 0.0 at the output boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Zero every missing or warm-up cell in the table
    #[default]
    ZeroAll,
    /// Zero warm-up cells only; missing data stays missing
    WarmupOnly,
}

impl FillPolicy {
    /// Whether this policy replaces the given cell
    pub fn fills(self, cell: Cell) -> bool {
        match self {
            FillPolicy::ZeroAll => !cell.is_defined(),
            FillPolicy::WarmupOnly => cell.is_warmup(),
        }
    }
}

/// Copy of `table` with undefined float cells set to 0.0 per `policy`
pub fn fill_undefined(table: &Table, policy: FillPolicy) -> Table {
    let mut output = table.clone();
    let mut filled = 0usize;
    for cell in output.float_cells_mut() {
        if policy.fills(*cell) {
            *cell = Cell::Value(0.0);
            filled += 1;
        }
    }
    debug!("Filled {} undefined cells with 0 ({:?})", filled, policy);
    output
}
