use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::{
    number_points, BoundingBox, Obstacle, ObstacleRecord, PathPoint, StoredPoint,
    TrajectoryRecord, WorkArea, WorkAreaId, WorkAreaRecord, WorkAreaStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    record: WorkAreaRecord,
    obstacles: Vec<ObstacleRecord>,
    points: Vec<StoredPoint>,
}

/// Process-local store, used by tests and the `memory` storage backend.
#[derive(Debug, Default)]
pub struct InMemoryWorkAreaStore {
    entries: RwLock<HashMap<WorkAreaId, Entry>>,
    // Creation order, so listings are stable.
    order: RwLock<Vec<WorkAreaId>>,
}

impl InMemoryWorkAreaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: WorkAreaId) -> DomainError {
    DomainError::NotFound { id: id.to_string() }
}

#[async_trait]
impl WorkAreaStore for InMemoryWorkAreaStore {
    async fn create_work_area(&self, name: &str, area: &WorkArea) -> DomainResult<WorkAreaId> {
        let id = WorkAreaId::new();
        let record = WorkAreaRecord {
            id,
            name: name.to_string(),
            width: area.width,
            height: area.height,
            created_at: Utc::now(),
        };
        self.entries.write().await.insert(
            id,
            Entry { record, obstacles: Vec::new(), points: Vec::new() },
        );
        self.order.write().await.push(id);
        Ok(id)
    }

    async fn store_obstacles(
        &self,
        id: WorkAreaId,
        obstacles: &[Obstacle],
    ) -> DomainResult<Vec<ObstacleRecord>> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or_else(|| not_found(id))?;
        let records: Vec<ObstacleRecord> = obstacles
            .iter()
            .cloned()
            .map(|o| ObstacleRecord::new(id, o))
            .collect();
        entry.obstacles.extend(records.iter().cloned());
        Ok(records)
    }

    async fn store_path(&self, id: WorkAreaId, points: &[PathPoint]) -> DomainResult<usize> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or_else(|| not_found(id))?;
        entry.points = number_points(points);
        Ok(entry.points.len())
    }

    async fn load_trajectory(&self, id: WorkAreaId) -> DomainResult<TrajectoryRecord> {
        let entries = self.entries.read().await;
        let entry = entries.get(&id).ok_or_else(|| not_found(id))?;
        Ok(TrajectoryRecord {
            work_area: entry.record.clone(),
            obstacles: entry.obstacles.clone(),
            points: entry.points.clone(),
        })
    }

    async fn obstacles_in_region(
        &self,
        id: WorkAreaId,
        region: BoundingBox,
    ) -> DomainResult<Vec<ObstacleRecord>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&id).ok_or_else(|| not_found(id))?;
        Ok(entry
            .obstacles
            .iter()
            .filter(|r| r.bbox.intersects(&region))
            .cloned()
            .collect())
    }

    async fn list_obstacles(&self, id: Option<WorkAreaId>) -> DomainResult<Vec<ObstacleRecord>> {
        let entries = self.entries.read().await;
        match id {
            Some(id) => Ok(entries.get(&id).ok_or_else(|| not_found(id))?.obstacles.clone()),
            None => {
                let order = self.order.read().await;
                Ok(order
                    .iter()
                    .filter_map(|id| entries.get(id))
                    .flat_map(|e| e.obstacles.iter().cloned())
                    .collect())
            }
        }
    }
}
