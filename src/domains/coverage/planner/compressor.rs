use crate::domains::coverage::aggregate::{PathPoint, PointKind};

const DUPLICATE_EPSILON: f64 = 1e-6;

/// Drop points lying within 1e-6 of the previously kept point on both axes.
///
/// When a coverage sample collapses onto a detour waypoint the kept point takes
/// the coverage tag.
pub fn compress(points: Vec<PathPoint>) -> Vec<PathPoint> {
    let mut kept: Vec<PathPoint> = Vec::with_capacity(points.len());
    for point in points {
        match kept.last_mut() {
            Some(last) if is_duplicate(last, &point) => {
                if point.kind == PointKind::Coverage {
                    last.kind = PointKind::Coverage;
                }
            }
            _ => kept.push(point),
        }
    }
    kept
}

fn is_duplicate(a: &PathPoint, b: &PathPoint) -> bool {
    (a.x - b.x).abs() <= DUPLICATE_EPSILON && (a.y - b.y).abs() <= DUPLICATE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_consecutive_near_duplicates_only() {
        let points = vec![
            PathPoint::coverage(0.0, 0.0),
            PathPoint::coverage(0.0000004, 0.0),
            PathPoint::coverage(1.0, 0.0),
            PathPoint::coverage(0.0, 0.0),
        ];
        let out = compress(points);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].x, 1.0);
        assert_eq!(out[2].x, 0.0);
    }

    #[test]
    fn coverage_tag_survives_a_merge() {
        let points = vec![PathPoint::detour(0.8, 0.5), PathPoint::coverage(0.8, 0.5)];
        let out = compress(points);
        assert_eq!(out, vec![PathPoint::coverage(0.8, 0.5)]);
    }
}
