use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweepDirection {
    LeftToRight,
    RightToLeft,
}

impl SweepDirection {
    pub fn for_row(index: usize) -> Self {
        if index % 2 == 0 {
            SweepDirection::LeftToRight
        } else {
            SweepDirection::RightToLeft
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            SweepDirection::LeftToRight => 1,
            SweepDirection::RightToLeft => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub index: usize,
    pub y: f64,
    pub direction: SweepDirection,
}

/// Closed x-range on a scan row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    /// Sample of a free interval; the tool is working here.
    Coverage,
    /// Waypoint of a perimeter route around a blocking obstacle.
    Detour,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
}

impl PathPoint {
    pub fn coverage(x: f64, y: f64) -> Self {
        Self { x, y, kind: PointKind::Coverage }
    }

    pub fn detour(x: f64, y: f64) -> Self {
        Self { x, y, kind: PointKind::Detour }
    }

    pub fn is_coverage(&self) -> bool {
        self.kind == PointKind::Coverage
    }
}
