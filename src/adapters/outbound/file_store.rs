use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::{
    number_points, BoundingBox, Obstacle, ObstacleRecord, PathPoint, TrajectoryRecord, WorkArea,
    WorkAreaId, WorkAreaRecord, WorkAreaStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-based store: one JSON document per work area, named `<id>.json`.
///
/// Writes go to a temporary file that is renamed over the document, and are
/// serialized through a single lock so concurrent updates of one process do not
/// interleave.
pub struct FileWorkAreaStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

fn io_err(context: &str, path: &Path, e: std::io::Error) -> DomainError {
    DomainError::InfrastructureError(format!("{} {}: {}", context, path.display(), e))
}

impl FileWorkAreaStore {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, id: WorkAreaId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    async fn ensure_base_dir(&self) -> DomainResult<()> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| io_err("Failed to create store directory", &self.base_path, e))
    }

    async fn read(&self, id: WorkAreaId) -> DomainResult<TrajectoryRecord> {
        let path = self.document_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::NotFound { id: id.to_string() });
            }
            Err(e) => return Err(io_err("Failed to read", &path, e)),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, record: &TrajectoryRecord) -> DomainResult<()> {
        self.ensure_base_dir().await?;
        let path = self.document_path(record.work_area.id);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| io_err("Failed to write", &tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_err("Failed to replace", &path, e))
    }

    async fn update<F>(&self, id: WorkAreaId, change: F) -> DomainResult<TrajectoryRecord>
    where
        F: FnOnce(&mut TrajectoryRecord) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read(id).await?;
        change(&mut record);
        self.write(&record).await?;
        Ok(record)
    }

    async fn read_all(&self) -> DomainResult<Vec<TrajectoryRecord>> {
        let mut dir = match tokio::fs::read_dir(&self.base_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err("Failed to list", &self.base_path, e)),
        };
        let mut records = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| io_err("Failed to list", &self.base_path, e))?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| io_err("Failed to read", &path, e))?;
            records.push(serde_json::from_str::<TrajectoryRecord>(&content)?);
        }
        records.sort_by_key(|r| r.work_area.created_at);
        Ok(records)
    }
}

#[async_trait]
impl WorkAreaStore for FileWorkAreaStore {
    async fn create_work_area(&self, name: &str, area: &WorkArea) -> DomainResult<WorkAreaId> {
        let id = WorkAreaId::new();
        let record = TrajectoryRecord {
            work_area: WorkAreaRecord {
                id,
                name: name.to_string(),
                width: area.width,
                height: area.height,
                created_at: Utc::now(),
            },
            obstacles: Vec::new(),
            points: Vec::new(),
        };
        let _guard = self.write_lock.lock().await;
        self.write(&record).await?;
        Ok(id)
    }

    async fn store_obstacles(
        &self,
        id: WorkAreaId,
        obstacles: &[Obstacle],
    ) -> DomainResult<Vec<ObstacleRecord>> {
        let records: Vec<ObstacleRecord> = obstacles
            .iter()
            .cloned()
            .map(|o| ObstacleRecord::new(id, o))
            .collect();
        let added = records.clone();
        self.update(id, move |doc| doc.obstacles.extend(added)).await?;
        Ok(records)
    }

    async fn store_path(&self, id: WorkAreaId, points: &[PathPoint]) -> DomainResult<usize> {
        let numbered = number_points(points);
        let count = numbered.len();
        self.update(id, move |doc| doc.points = numbered).await?;
        Ok(count)
    }

    async fn load_trajectory(&self, id: WorkAreaId) -> DomainResult<TrajectoryRecord> {
        self.read(id).await
    }

    async fn obstacles_in_region(
        &self,
        id: WorkAreaId,
        region: BoundingBox,
    ) -> DomainResult<Vec<ObstacleRecord>> {
        let record = self.read(id).await?;
        Ok(record
            .obstacles
            .into_iter()
            .filter(|r| r.bbox.intersects(&region))
            .collect())
    }

    async fn list_obstacles(&self, id: Option<WorkAreaId>) -> DomainResult<Vec<ObstacleRecord>> {
        match id {
            Some(id) => Ok(self.read(id).await?.obstacles),
            None => Ok(self
                .read_all()
                .await?
                .into_iter()
                .flat_map(|r| r.obstacles)
                .collect()),
        }
    }
}
