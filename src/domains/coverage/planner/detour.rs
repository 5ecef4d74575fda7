use super::params::BoundaryPolicy;
use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::aggregate::{BoundingBox, Obstacle, PathPoint, ScanRow, WorkArea};

/// Offset that keeps the first detour waypoint off the last sample and the
/// last waypoint off the row the next segment starts on.
const EDGE_NUDGE: f64 = 0.001;

#[derive(Debug, Clone, Copy)]
pub struct DetourRequest<'a> {
    pub obstacle: &'a Obstacle,
    pub row: ScanRow,
    pub from_x: f64,
    pub to_x: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detour {
    pub waypoints: Vec<PathPoint>,
    /// Set when the clamp policy moved the route to fit inside the work area.
    pub clamped: bool,
}

/// Four-waypoint route over the obstacle's expanded box, leaving the row on the
/// side `from_x` is on and landing just above the row on the other side.
pub fn build_detour(
    request: &DetourRequest<'_>,
    area: &WorkArea,
    policy: BoundaryPolicy,
) -> DomainResult<Detour> {
    let expanded = request.obstacle.bounding_box().expanded(request.margin);
    let y = request.row.y;

    let (lane, mut clamped) = match policy {
        BoundaryPolicy::Clamp => clamp_lane(&expanded, area),
        _ => (expanded.max_y, false),
    };

    let from_left = if request.from_x == expanded.center_x() {
        request.to_x > request.from_x
    } else {
        request.from_x < expanded.center_x()
    };

    let (left, right) = (expanded.min_x, expanded.max_x);
    let route = if from_left {
        [
            ((request.from_x + EDGE_NUDGE).min(left), y),
            (left, lane),
            (right, lane),
            (right, y + EDGE_NUDGE),
        ]
    } else {
        [
            ((request.from_x - EDGE_NUDGE).max(right), y),
            (right, lane),
            (left, lane),
            (left, y + EDGE_NUDGE),
        ]
    };

    let bounds = area.bounds();
    let mut waypoints = Vec::with_capacity(route.len());
    for (x, wy) in route {
        match policy {
            BoundaryPolicy::Permit => waypoints.push(PathPoint::detour(x, wy)),
            BoundaryPolicy::Reject => {
                if !bounds.contains_point(x, wy) {
                    return Err(DomainError::DetourOutOfBounds {
                        row_index: request.row.index,
                        x,
                        y: wy,
                    });
                }
                waypoints.push(PathPoint::detour(x, wy));
            }
            BoundaryPolicy::Clamp => {
                let cx = x.clamp(bounds.min_x, bounds.max_x);
                let cy = wy.clamp(bounds.min_y, bounds.max_y);
                clamped |= cx != x || cy != wy;
                waypoints.push(PathPoint::detour(cx, cy));
            }
        }
    }

    Ok(Detour { waypoints, clamped })
}

// Over the top when it fits, under the bottom when that fits, else the top edge.
fn clamp_lane(expanded: &BoundingBox, area: &WorkArea) -> (f64, bool) {
    if expanded.max_y <= area.height {
        (expanded.max_y, false)
    } else if expanded.min_y >= 0.0 {
        (expanded.min_y, true)
    } else {
        (area.height, true)
    }
}
