use super::aggregate::{BoundingBox, Obstacle, PathPoint, WorkArea};
use super::ports::TrajectoryRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawSegment {
    pub from: PathPoint,
    pub to: PathPoint,
}

/// Consecutive point pairs whose bounding box stays clear of every obstacle.
///
/// Applied by viewers on top of the planner's own guarantee. The test is closed,
/// so a segment ending on an obstacle edge is dropped as well.
pub fn drawable_segments(points: &[PathPoint], obstacles: &[Obstacle]) -> Vec<DrawSegment> {
    let boxes: Vec<BoundingBox> = obstacles.iter().map(Obstacle::bounding_box).collect();
    points
        .windows(2)
        .filter_map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            let segment = BoundingBox::from_corners(from.x, from.y, to.x, to.y);
            (!boxes.iter().any(|b| segment.intersects(b))).then_some(DrawSegment { from, to })
        })
        .collect()
}

/// Robot marker stepping through a path and starting over at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerCursor {
    position: f64,
    speed: f64,
    paused: bool,
}

impl MarkerCursor {
    /// `speed` is the number of points advanced per tick.
    pub fn new(speed: f64) -> Self {
        Self { position: 0.0, speed: speed.max(0.0), paused: false }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn index(&self) -> usize {
        self.position as usize
    }

    /// Advance one tick over a path of `len` points.
    pub fn tick(&mut self, len: usize) {
        if self.paused || len == 0 {
            return;
        }
        self.position += self.speed;
        if self.position >= len as f64 {
            self.position = 0.0;
        }
    }

    pub fn current<'a>(&self, points: &'a [PathPoint]) -> Option<&'a PathPoint> {
        if points.is_empty() {
            return None;
        }
        points.get(self.index() % points.len())
    }
}

/// Drawing model of a stored trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPreview {
    pub area: WorkArea,
    pub obstacles: Vec<Obstacle>,
    pub points: Vec<PathPoint>,
    pub segments: Vec<DrawSegment>,
}

impl TrajectoryPreview {
    pub fn from_record(record: &TrajectoryRecord) -> Self {
        let obstacles = record.obstacle_shapes();
        let points = record.path_points();
        let segments = drawable_segments(&points, &obstacles);
        Self { area: record.area(), obstacles, points, segments }
    }

    /// Number of path segments the safety filter withheld.
    pub fn hidden_segments(&self) -> usize {
        self.points.len().saturating_sub(1) - self.segments.len()
    }
}
