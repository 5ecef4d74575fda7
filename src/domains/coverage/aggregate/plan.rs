use super::types::{Interval, PathPoint, PointKind, ScanRow};
use serde::{Deserialize, Serialize};

/// What the planner saw on one scan row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPlan {
    pub row: ScanRow,
    pub free_intervals: Vec<Interval>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanDiagnostic {
    /// A gap on a single row for which no blocking obstacle could be located.
    /// The planner connected the two points directly.
    GeometryInconsistency {
        row_index: usize,
        y: f64,
        from_x: f64,
        to_x: f64,
    },
    /// A detour waypoint was moved to keep it inside the work area.
    DetourClamped { row_index: usize, obstacle_index: usize },
    /// No obstacle-free route joins the end of the previous row to `row_index`,
    /// so the two points were connected directly.
    ConnectorBlocked {
        row_index: usize,
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoveragePath {
    pub points: Vec<PathPoint>,
    pub rows: Vec<RowPlan>,
    pub diagnostics: Vec<PlanDiagnostic>,
}

impl CoveragePath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn count_of(&self, kind: PointKind) -> usize {
        self.points.iter().filter(|p| p.kind == kind).count()
    }
}
