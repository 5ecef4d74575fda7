//! Obstacle-aware lawnmower coverage planning.
//!
//! Rows are scheduled bottom to top, each row's free space is sampled in the
//! row's sweep direction, and the row segments are stitched into one path with
//! perimeter detours around obstacles that split a row. Row changes are routed
//! around obstacles lying between rows.

pub mod blockers;
pub mod compressor;
pub mod connector;
pub mod detour;
pub mod intervals;
pub mod params;
pub mod rows;
pub mod sampler;
pub mod stitcher;

pub use blockers::{resolve_row_obstacles, RowBlocker, RowBlockers};
pub use compressor::compress;
pub use connector::{route_connector, Connector};
pub use detour::{build_detour, Detour, DetourRequest};
pub use intervals::free_intervals;
pub use params::{BoundaryPolicy, PlanningParams};
pub use rows::schedule_rows;
pub use sampler::sample_interval;
pub use stitcher::{stitch_row, PathAccumulator, RowInput, StitchContext};

use crate::common::DomainResult;
use crate::domains::coverage::aggregate::{
    CoveragePath, Interval, Obstacle, PlanDiagnostic, PointKind, ScanRow, SweepDirection, WorkArea,
};
use crate::domains::logger::DynLogger;

/// Stateless planner; one instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct CoveragePlanner {
    params: PlanningParams,
    logger: DynLogger,
}

impl CoveragePlanner {
    pub fn new(params: PlanningParams, logger: DynLogger) -> DomainResult<Self> {
        params.validate()?;
        Ok(Self { params, logger })
    }

    pub fn params(&self) -> &PlanningParams {
        &self.params
    }

    /// Same planner with different parameters, sharing the logger.
    pub fn with_params(&self, params: PlanningParams) -> DomainResult<Self> {
        Self::new(params, self.logger.clone())
    }

    pub fn plan(&self, area: &WorkArea, obstacles: &[Obstacle]) -> DomainResult<CoveragePath> {
        area.validate()?;
        for obstacle in obstacles {
            obstacle.validate()?;
        }

        let rows = schedule_rows(area.height, self.params.row_step)?;
        let ctx = StitchContext { area, params: &self.params, obstacles };
        let acc = rows.iter().try_fold(PathAccumulator::default(), |acc, row| {
            let input = self.prepare_row(*row, area, obstacles)?;
            stitch_row(acc, &input, &ctx)
        })?;

        let path = CoveragePath {
            points: compress(acc.points),
            rows: acc.rows,
            diagnostics: acc.diagnostics,
        };
        self.report(&path, obstacles.len());
        Ok(path)
    }

    fn prepare_row<'a>(
        &self,
        row: ScanRow,
        area: &WorkArea,
        obstacles: &'a [Obstacle],
    ) -> DomainResult<RowInput<'a>> {
        let blockers = RowBlockers::resolve(obstacles, row.y);
        let free = free_intervals(Interval::new(0.0, area.width), &blockers.x_intervals());

        let ordered: Vec<Interval> = match row.direction {
            SweepDirection::LeftToRight => free.clone(),
            SweepDirection::RightToLeft => free.iter().rev().copied().collect(),
        };
        let segments = ordered
            .into_iter()
            .map(|interval| sample_interval(interval, row.y, self.params.sample_step, row.direction))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(RowInput { row, free_intervals: free, segments, blockers })
    }

    fn report(&self, path: &CoveragePath, obstacle_count: usize) {
        for diagnostic in &path.diagnostics {
            match diagnostic {
                PlanDiagnostic::GeometryInconsistency { row_index, y, from_x, to_x } => {
                    self.logger.warn(&format!(
                        "row {} (y={:.3}): no obstacle explains the gap {:.3} -> {:.3}, connected directly",
                        row_index, y, from_x, to_x
                    ));
                }
                PlanDiagnostic::DetourClamped { row_index, obstacle_index } => {
                    self.logger.warn(&format!(
                        "row {}: detour around obstacle #{} clamped to the work area",
                        row_index, obstacle_index
                    ));
                }
                PlanDiagnostic::ConnectorBlocked { row_index, from_x, from_y, to_x, to_y } => {
                    self.logger.warn(&format!(
                        "row {}: no obstacle-free connector from ({:.3}, {:.3}) to ({:.3}, {:.3}), connected directly",
                        row_index, from_x, from_y, to_x, to_y
                    ));
                }
            }
        }
        self.logger.info(&format!(
            "Planned {} points over {} rows around {} obstacles ({} detour waypoints)",
            path.len(),
            path.rows.len(),
            obstacle_count,
            path.count_of(PointKind::Detour)
        ));
    }
}
