use super::blockers::RowBlockers;
use super::connector::{route_connector, Connector};
use super::detour::{build_detour, DetourRequest};
use super::params::PlanningParams;
use crate::common::DomainResult;
use crate::domains::coverage::aggregate::{
    Interval, Obstacle, PathPoint, PlanDiagnostic, RowPlan, ScanRow, WorkArea,
};

const SAME_ROW_EPSILON: f64 = 1e-6;
const ADJACENCY_SLACK: f64 = 1e-6;

/// Everything the stitcher needs to know about one scan row.
#[derive(Debug, Clone)]
pub struct RowInput<'a> {
    pub row: ScanRow,
    /// Free intervals in ascending x order.
    pub free_intervals: Vec<Interval>,
    /// Sampled free intervals, already ordered by the row's sweep direction.
    pub segments: Vec<Vec<PathPoint>>,
    pub blockers: RowBlockers<'a>,
}

/// Path state threaded from row to row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathAccumulator {
    pub points: Vec<PathPoint>,
    pub rows: Vec<RowPlan>,
    pub diagnostics: Vec<PlanDiagnostic>,
}

#[derive(Debug, Clone, Copy)]
pub struct StitchContext<'a> {
    pub area: &'a WorkArea,
    pub params: &'a PlanningParams,
    pub obstacles: &'a [Obstacle],
}

/// Append one row's segments to the accumulated path.
///
/// On the same row, a gap spanned by a blocker goes around the first one in
/// resolver order. A gap within one sample step and no blocker is contiguous,
/// any wider one is connected directly and reported. The connector from the
/// previous row is routed around every obstacle it would cross.
pub fn stitch_row(
    acc: PathAccumulator,
    input: &RowInput<'_>,
    ctx: &StitchContext<'_>,
) -> DomainResult<PathAccumulator> {
    let mut acc = acc;
    let sample_count = input.segments.iter().map(Vec::len).sum();

    for segment in &input.segments {
        let (Some(first), Some(last)) = (segment.first().copied(), acc.points.last().copied())
        else {
            acc.points.extend_from_slice(segment);
            continue;
        };

        let same_row = (last.y - first.y).abs() < SAME_ROW_EPSILON;
        if !same_row {
            let from = (last.x, last.y);
            let to = (first.x, first.y);
            match route_connector(from, to, ctx.obstacles, ctx.area, ctx.params.margin) {
                Connector::Direct => {}
                Connector::Routed(corners) => acc.points.extend(corners),
                Connector::Blocked => acc.diagnostics.push(PlanDiagnostic::ConnectorBlocked {
                    row_index: input.row.index,
                    from_x: last.x,
                    from_y: last.y,
                    to_x: first.x,
                    to_y: first.y,
                }),
            }
            acc.points.extend_from_slice(segment);
            continue;
        }

        let contiguous = (last.x - first.x).abs() <= ctx.params.sample_step + ADJACENCY_SLACK;
        match input.blockers.first_overlapping(last.x, first.x) {
            Some(blocker) => {
                let request = DetourRequest {
                    obstacle: blocker.obstacle,
                    row: input.row,
                    from_x: last.x,
                    to_x: first.x,
                    margin: ctx.params.margin,
                };
                let detour = build_detour(&request, ctx.area, ctx.params.boundary_policy)?;
                if detour.clamped {
                    acc.diagnostics.push(PlanDiagnostic::DetourClamped {
                        row_index: input.row.index,
                        obstacle_index: blocker.ordinal,
                    });
                }
                acc.points.extend(detour.waypoints);
            }
            None if contiguous => {}
            None => {
                acc.diagnostics.push(PlanDiagnostic::GeometryInconsistency {
                    row_index: input.row.index,
                    y: input.row.y,
                    from_x: last.x,
                    to_x: first.x,
                });
            }
        }
        acc.points.extend_from_slice(segment);
    }

    acc.rows.push(RowPlan {
        row: input.row,
        free_intervals: input.free_intervals.clone(),
        sample_count,
    });
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::coverage::aggregate::{PointKind, SweepDirection};

    fn row(index: usize, y: f64) -> ScanRow {
        ScanRow { index, y, direction: SweepDirection::for_row(index) }
    }

    #[test]
    fn unexplained_gap_is_reported_and_bridged() {
        let area = WorkArea { width: 3.0, height: 1.0 };
        let params = PlanningParams::new(1.0, 0.5, 0.1);
        let ctx = StitchContext { area: &area, params: &params, obstacles: &[] };
        let input = RowInput {
            row: row(0, 0.5),
            free_intervals: vec![Interval::new(0.0, 1.0), Interval::new(2.0, 3.0)],
            segments: vec![
                vec![PathPoint::coverage(0.0, 0.5), PathPoint::coverage(1.0, 0.5)],
                vec![PathPoint::coverage(2.0, 0.5), PathPoint::coverage(3.0, 0.5)],
            ],
            blockers: RowBlockers::default(),
        };

        let acc = stitch_row(PathAccumulator::default(), &input, &ctx).unwrap();
        assert_eq!(acc.points.len(), 4);
        assert!(acc.points.iter().all(|p| p.kind == PointKind::Coverage));
        assert_eq!(
            acc.diagnostics,
            vec![PlanDiagnostic::GeometryInconsistency { row_index: 0, y: 0.5, from_x: 1.0, to_x: 2.0 }]
        );
        assert_eq!(acc.rows[0].sample_count, 4);
    }

    #[test]
    fn row_change_without_blocker_is_silent() {
        let area = WorkArea { width: 1.0, height: 2.0 };
        let params = PlanningParams::new(1.0, 0.5, 0.1);
        let ctx = StitchContext { area: &area, params: &params, obstacles: &[] };
        let first = RowInput {
            row: row(0, 0.5),
            free_intervals: vec![Interval::new(0.0, 1.0)],
            segments: vec![vec![PathPoint::coverage(0.0, 0.5), PathPoint::coverage(1.0, 0.5)]],
            blockers: RowBlockers::default(),
        };
        let second = RowInput {
            row: row(1, 1.5),
            free_intervals: vec![Interval::new(0.0, 1.0)],
            segments: vec![vec![PathPoint::coverage(1.0, 1.5), PathPoint::coverage(0.0, 1.5)]],
            blockers: RowBlockers::default(),
        };

        let acc = [first, second]
            .iter()
            .try_fold(PathAccumulator::default(), |acc, input| stitch_row(acc, input, &ctx))
            .unwrap();
        assert_eq!(acc.points.len(), 4);
        assert!(acc.diagnostics.is_empty());
        assert_eq!(acc.rows.len(), 2);
    }

    #[test]
    fn blocker_narrower_than_sample_step_still_gets_a_detour() {
        let area = WorkArea { width: 2.0, height: 1.0 };
        let params = PlanningParams::new(1.0, 0.5, 0.06);
        let obstacles = [Obstacle::new(1.0, 0.5, 0.4, 1.0)];
        let ctx = StitchContext { area: &area, params: &params, obstacles: &obstacles };
        let input = RowInput {
            row: row(0, 0.5),
            free_intervals: vec![Interval::new(0.0, 0.8), Interval::new(1.2, 2.0)],
            segments: vec![
                vec![
                    PathPoint::coverage(0.0, 0.5),
                    PathPoint::coverage(0.5, 0.5),
                    PathPoint::coverage(0.8, 0.5),
                ],
                vec![
                    PathPoint::coverage(1.2, 0.5),
                    PathPoint::coverage(1.7, 0.5),
                    PathPoint::coverage(2.0, 0.5),
                ],
            ],
            blockers: RowBlockers::resolve(&obstacles, 0.5),
        };

        let acc = stitch_row(PathAccumulator::default(), &input, &ctx).unwrap();
        assert_eq!(acc.points.len(), 10);
        let detours: Vec<_> = acc.points.iter().filter(|p| p.kind == PointKind::Detour).collect();
        assert_eq!(detours.len(), 4);
        assert!(detours.iter().all(|p| p.x < 0.8 || p.x > 1.2 || p.y > 1.0));
        assert!(acc.diagnostics.is_empty());
    }

    #[test]
    fn row_change_is_routed_around_an_edge_obstacle() {
        let area = WorkArea { width: 2.0, height: 1.0 };
        let params = PlanningParams::new(0.5, 0.25, 0.06);
        let obstacles = [Obstacle::new(1.85, 0.25, 0.3, 0.2)];
        let ctx = StitchContext { area: &area, params: &params, obstacles: &obstacles };
        let first = RowInput {
            row: row(0, 0.25),
            free_intervals: vec![Interval::new(0.0, 1.7)],
            segments: vec![vec![PathPoint::coverage(1.5, 0.25), PathPoint::coverage(1.7, 0.25)]],
            blockers: RowBlockers::resolve(&obstacles, 0.25),
        };
        let second = RowInput {
            row: row(1, 0.75),
            free_intervals: vec![Interval::new(0.0, 2.0)],
            segments: vec![vec![PathPoint::coverage(2.0, 0.75), PathPoint::coverage(1.75, 0.75)]],
            blockers: RowBlockers::resolve(&obstacles, 0.75),
        };

        let acc = [first, second]
            .iter()
            .try_fold(PathAccumulator::default(), |acc, input| stitch_row(acc, input, &ctx))
            .unwrap();
        assert_eq!(acc.points.len(), 5);
        assert_eq!(acc.points[2], PathPoint::detour(1.7, 0.75));
        assert!(acc.diagnostics.is_empty());
    }
}
