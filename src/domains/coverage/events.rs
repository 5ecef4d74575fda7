use super::ports::WorkAreaId;
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CoverageEvent {
    WorkAreaCreated {
        work_area_id: WorkAreaId,
        name: String,
        width: f64,
        height: f64,
        timestamp: DateTime<Utc>,
    },
    ObstaclesStored {
        work_area_id: WorkAreaId,
        count: usize,
        timestamp: DateTime<Utc>,
    },
    PathGenerated {
        work_area_id: WorkAreaId,
        points_count: usize,
        detour_points: usize,
        diagnostics: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for CoverageEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CoverageEvent::WorkAreaCreated { .. } => "WorkAreaCreated",
            CoverageEvent::ObstaclesStored { .. } => "ObstaclesStored",
            CoverageEvent::PathGenerated { .. } => "PathGenerated",
        }
    }

    fn aggregate_id(&self) -> String {
        match self {
            CoverageEvent::WorkAreaCreated { work_area_id, .. } => work_area_id.to_string(),
            CoverageEvent::ObstaclesStored { work_area_id, .. } => work_area_id.to_string(),
            CoverageEvent::PathGenerated { work_area_id, .. } => work_area_id.to_string(),
        }
    }

    fn event_version(&self) -> u64 { 1 }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CoverageEvent::WorkAreaCreated { timestamp, .. } => *timestamp,
            CoverageEvent::ObstaclesStored { timestamp, .. } => *timestamp,
            CoverageEvent::PathGenerated { timestamp, .. } => *timestamp,
        }
    }
}
