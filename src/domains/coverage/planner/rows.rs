use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::aggregate::{ScanRow, SweepDirection};

const ROW_EPSILON: f64 = 1e-9;

/// Scan rows at half-step offsets from the bottom edge, `row_step/2 + k*row_step`,
/// for every such y below `height + 1e-9`. Directions alternate starting left to right.
pub fn schedule_rows(height: f64, row_step: f64) -> DomainResult<Vec<ScanRow>> {
    if !(row_step.is_finite() && row_step > 0.0) {
        return Err(DomainError::invalid(format!(
            "row_step must be positive, got {}",
            row_step
        )));
    }
    if !height.is_finite() {
        return Err(DomainError::invalid("height must be finite"));
    }

    let mut rows = Vec::new();
    loop {
        let index = rows.len();
        let y = row_step * (index as f64 + 0.5);
        if y >= height + ROW_EPSILON {
            break;
        }
        rows.push(ScanRow {
            index,
            y,
            direction: SweepDirection::for_row(index),
        });
    }
    Ok(rows)
}
