use super::aggregate::{BoundingBox, Obstacle, PathPoint, PointKind, WorkArea};
use crate::common::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkAreaId(pub Uuid);

impl WorkAreaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkAreaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WorkAreaId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(WorkAreaId)
            .map_err(|e| DomainError::invalid(format!("invalid work area id {}: {}", s, e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkAreaRecord {
    pub id: WorkAreaId,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub created_at: DateTime<Utc>,
}

/// A stored obstacle together with the box used for spatial queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub id: Uuid,
    pub work_area_id: WorkAreaId,
    #[serde(flatten)]
    pub obstacle: Obstacle,
    pub bbox: BoundingBox,
}

impl ObstacleRecord {
    pub fn new(work_area_id: WorkAreaId, obstacle: Obstacle) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_area_id,
            bbox: obstacle.bounding_box(),
            obstacle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredPoint {
    pub ord: usize,
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
}

/// Everything a viewer needs to redraw a planned wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    #[serde(flatten)]
    pub work_area: WorkAreaRecord,
    pub obstacles: Vec<ObstacleRecord>,
    pub points: Vec<StoredPoint>,
}

impl TrajectoryRecord {
    pub fn area(&self) -> WorkArea {
        WorkArea {
            width: self.work_area.width,
            height: self.work_area.height,
        }
    }

    pub fn obstacle_shapes(&self) -> Vec<Obstacle> {
        self.obstacles.iter().map(|r| r.obstacle.clone()).collect()
    }

    pub fn path_points(&self) -> Vec<PathPoint> {
        self.points
            .iter()
            .map(|p| PathPoint { x: p.x, y: p.y, kind: p.kind })
            .collect()
    }
}

pub fn number_points(points: &[PathPoint]) -> Vec<StoredPoint> {
    points
        .iter()
        .enumerate()
        .map(|(ord, p)| StoredPoint { ord, x: p.x, y: p.y, kind: p.kind })
        .collect()
}

/// Port for persisting work areas, their obstacles and planned paths.
#[async_trait]
pub trait WorkAreaStore: Send + Sync {
    async fn create_work_area(&self, name: &str, area: &WorkArea) -> DomainResult<WorkAreaId>;

    async fn store_obstacles(
        &self,
        id: WorkAreaId,
        obstacles: &[Obstacle],
    ) -> DomainResult<Vec<ObstacleRecord>>;

    /// Replace the stored path of `id` with `points`, keeping their order.
    async fn store_path(&self, id: WorkAreaId, points: &[PathPoint]) -> DomainResult<usize>;

    async fn load_trajectory(&self, id: WorkAreaId) -> DomainResult<TrajectoryRecord>;

    /// Obstacles of `id` whose bounding box intersects `region`.
    async fn obstacles_in_region(
        &self,
        id: WorkAreaId,
        region: BoundingBox,
    ) -> DomainResult<Vec<ObstacleRecord>>;

    async fn list_obstacles(&self, id: Option<WorkAreaId>) -> DomainResult<Vec<ObstacleRecord>>;
}
