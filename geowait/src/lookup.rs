use crate::error::{DomainError, FindError};
use crate::table::{ScaleTable, GRID_START, GRID_STEP};
use tracing::debug;

/// Scale for `elapsed_time`, linearly interpolated between neighbouring grid points.
///
/// Queries before the first grid point return the first entry and queries at
/// or past the last grid point return the last entry. The upper bound comes
/// from the table's own length.
pub fn lookup(elapsed_time: i64, table: &ScaleTable) -> Result<f64, FindError> {
    let len = table.len();
    if len == 0 {
        return Err(DomainError::EmptyTable.into());
    }
    if elapsed_time < GRID_START {
        return entry(table, 0);
    }
    if elapsed_time >= table.grid_end() {
        return entry(table, len - 1);
    }

    let low = (elapsed_time / GRID_STEP - 1) as usize;
    let high = low + 1;
    let frac = (elapsed_time % GRID_STEP) as f64 / GRID_STEP as f64;
    let low_val = entry(table, low)?;
    let high_val = entry(table, high)?;
    let scale = low_val + frac * (high_val - low_val);
    debug!(elapsed_time, low, frac, scale, "interpolated scale");
    Ok(scale)
}

fn entry(table: &ScaleTable, index: usize) -> Result<f64, FindError> {
    table.get(index).map(f64::from).ok_or_else(|| {
        DomainError::IndexOutOfBounds {
            index,
            len: table.len(),
        }
        .into()
    })
}

impl ScaleTable {
    pub fn scale_at(&self, elapsed_time: i64) -> Result<f64, FindError> {
        lookup(elapsed_time, self)
    }
}
