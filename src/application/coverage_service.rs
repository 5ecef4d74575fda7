use crate::common::{ApplicationResult, DomainError};
use crate::domains::coverage::{
    CoverageEvent, CoveragePlanner, Obstacle, ObstacleRecord, PlanningParams, PointKind,
    TrajectoryPreview, TrajectoryRecord, WorkArea, WorkAreaId, WorkAreaStore,
};
use crate::domains::logger::DynLogger;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// A wall submitted for planning, with optional per-request planner overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallRequest {
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, alias = "step")]
    pub row_step: Option<f64>,
    #[serde(default)]
    pub sample_step: Option<f64>,
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl WallRequest {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            row_step: None,
            sample_step: None,
            margin: None,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    fn params_over(&self, defaults: &PlanningParams) -> PlanningParams {
        PlanningParams {
            row_step: self.row_step.unwrap_or(defaults.row_step),
            sample_step: self.sample_step.unwrap_or(defaults.sample_step),
            margin: self.margin.unwrap_or(defaults.margin),
            boundary_policy: defaults.boundary_policy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSubmission {
    pub work_area_id: WorkAreaId,
    pub points_count: usize,
    pub detour_points: usize,
    pub obstacles: Vec<ObstacleRecord>,
}

/// Validates, plans and persists submitted walls.
pub struct CoveragePlanningService {
    store: Arc<dyn WorkAreaStore>,
    planner: CoveragePlanner,
    logger: DynLogger,
    event_sender: Option<mpsc::Sender<CoverageEvent>>,
}

impl CoveragePlanningService {
    pub fn new(store: Arc<dyn WorkAreaStore>, planner: CoveragePlanner, logger: DynLogger) -> Self {
        Self { store, planner, logger, event_sender: None }
    }

    pub fn with_events(mut self, event_sender: mpsc::Sender<CoverageEvent>) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    #[instrument(skip(self, request), fields(wall = %request.name))]
    pub async fn submit_wall(&self, request: WallRequest) -> ApplicationResult<WallSubmission> {
        if request.name.trim().is_empty() {
            return Err(DomainError::invalid("work area name must not be empty").into());
        }
        let area = WorkArea::new(request.width, request.height)?;
        for obstacle in &request.obstacles {
            obstacle.validate()?;
        }
        let planner = self.planner.with_params(request.params_over(self.planner.params()))?;
        // Planning errors must not leave a stored work area behind.
        let path = planner.plan(&area, &request.obstacles)?;

        let work_area_id = self.store.create_work_area(&request.name, &area).await?;
        self.publish(CoverageEvent::WorkAreaCreated {
            work_area_id,
            name: request.name.clone(),
            width: area.width,
            height: area.height,
            timestamp: Utc::now(),
        })
        .await;

        let obstacles = self.store.store_obstacles(work_area_id, &request.obstacles).await?;
        self.publish(CoverageEvent::ObstaclesStored {
            work_area_id,
            count: obstacles.len(),
            timestamp: Utc::now(),
        })
        .await;

        let points_count = self.store.store_path(work_area_id, &path.points).await?;
        let detour_points = path.count_of(PointKind::Detour);
        self.publish(CoverageEvent::PathGenerated {
            work_area_id,
            points_count,
            detour_points,
            diagnostics: path.diagnostics.len(),
            timestamp: Utc::now(),
        })
        .await;

        info!(%work_area_id, points_count, detour_points, "wall planned");
        self.logger.info(&format!(
            "Work area {} ({}) stored with {} path points",
            work_area_id, request.name, points_count
        ));

        Ok(WallSubmission { work_area_id, points_count, detour_points, obstacles })
    }

    pub async fn trajectory(&self, id: WorkAreaId) -> ApplicationResult<TrajectoryRecord> {
        Ok(self.store.load_trajectory(id).await?)
    }

    pub async fn obstacles(&self, id: Option<WorkAreaId>) -> ApplicationResult<Vec<ObstacleRecord>> {
        Ok(self.store.list_obstacles(id).await?)
    }

    pub async fn preview(&self, id: WorkAreaId) -> ApplicationResult<TrajectoryPreview> {
        let record = self.store.load_trajectory(id).await?;
        let preview = TrajectoryPreview::from_record(&record);
        if preview.hidden_segments() > 0 {
            self.logger.warn(&format!(
                "Work area {}: {} path segments touch obstacle boxes and are hidden",
                id,
                preview.hidden_segments()
            ));
        }
        Ok(preview)
    }

    async fn publish(&self, event: CoverageEvent) {
        let Some(sender) = &self.event_sender else {
            return;
        };
        if let Err(e) = sender.send(event).await {
            warn!("dropping coverage event: {}", e);
        }
    }
}
