use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::aggregate::{Interval, PathPoint, SweepDirection};

const ENDPOINT_EPSILON: f64 = 1e-9;

/// Discretise a free interval on row `y` at `sample_step` spacing.
///
/// Both endpoints are always present. For a right-to-left sweep the samples are
/// the same positions in reverse order.
pub fn sample_interval(
    interval: Interval,
    y: f64,
    sample_step: f64,
    direction: SweepDirection,
) -> DomainResult<Vec<PathPoint>> {
    if !(sample_step.is_finite() && sample_step > 0.0) {
        return Err(DomainError::invalid(format!(
            "sample_step must be positive, got {}",
            sample_step
        )));
    }
    let Interval { start: a, end: b } = interval;
    if !(b >= a) {
        return Err(DomainError::invalid(format!(
            "interval end {} lies before its start {}",
            b, a
        )));
    }

    let mut samples = Vec::new();
    let mut k = 0usize;
    loop {
        let x = a + sample_step * k as f64;
        if x > b + ENDPOINT_EPSILON {
            break;
        }
        samples.push(PathPoint::coverage(x.min(b), y));
        k += 1;
    }
    if let Some(last) = samples.last() {
        if (last.x - b).abs() > ENDPOINT_EPSILON {
            samples.push(PathPoint::coverage(b, y));
        }
    }

    if direction == SweepDirection::RightToLeft {
        samples.reverse();
    }
    Ok(samples)
}
