use std::sync::Arc;
use tokio::sync::mpsc;
use wall_finisher::adapters::outbound::{init_noop_logger, InMemoryWorkAreaStore};
use wall_finisher::application::{CoveragePlanningService, WallRequest};
use wall_finisher::domains::coverage::{
    BoundaryPolicy, CoverageEvent, CoveragePlanner, Obstacle, PlanningParams, PointKind,
    WorkAreaId, WorkAreaStore,
};
use wall_finisher::{ApplicationError, DomainError, DomainEvent};

fn service(store: Arc<InMemoryWorkAreaStore>) -> CoveragePlanningService {
    let planner = CoveragePlanner::new(PlanningParams::default(), init_noop_logger()).unwrap();
    CoveragePlanningService::new(store, planner, init_noop_logger())
}

fn scenario_request() -> WallRequest {
    let mut request = WallRequest::new("living room", 2.0, 1.0)
        .with_obstacle(Obstacle::named("socket", 1.0, 0.5, 0.4, 1.0));
    request.row_step = Some(1.0);
    request.sample_step = Some(0.5);
    request
}

#[tokio::test]
async fn test_submit_wall_stores_plan() {
    let store = Arc::new(InMemoryWorkAreaStore::new());
    let service = service(store.clone());

    let submission = service.submit_wall(scenario_request()).await.unwrap();
    assert_eq!(submission.points_count, 10);
    assert_eq!(submission.detour_points, 4);
    assert_eq!(submission.obstacles.len(), 1);
    assert_eq!(submission.obstacles[0].obstacle.name.as_deref(), Some("socket"));

    let trajectory = service.trajectory(submission.work_area_id).await.unwrap();
    assert_eq!(trajectory.work_area.name, "living room");
    assert_eq!(trajectory.points.len(), 10);
    assert!(trajectory.points.iter().enumerate().all(|(i, p)| p.ord == i));
    assert_eq!(trajectory.points[3].kind, PointKind::Detour);
    assert!((trajectory.points[9].x - 2.0).abs() < 1e-9);

    let listed = service.obstacles(Some(submission.work_area_id)).await.unwrap();
    assert_eq!(listed, submission.obstacles);
}

#[tokio::test]
async fn test_submit_wall_publishes_events_in_order() {
    let store = Arc::new(InMemoryWorkAreaStore::new());
    let (tx, mut rx) = mpsc::channel(8);
    let service = service(store).with_events(tx);

    let submission = service.submit_wall(scenario_request()).await.unwrap();
    drop(service);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let types: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(types, vec!["WorkAreaCreated", "ObstaclesStored", "PathGenerated"]);
    assert!(events
        .iter()
        .all(|e| e.aggregate_id() == submission.work_area_id.to_string()));

    match &events[2] {
        CoverageEvent::PathGenerated { points_count, detour_points, diagnostics, .. } => {
            assert_eq!(*points_count, 10);
            assert_eq!(*detour_points, 4);
            assert_eq!(*diagnostics, 0);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_request_accepts_step_alias() {
    let request: WallRequest = serde_json::from_str(
        r#"{
            "name": "hall",
            "width": 2.0,
            "height": 1.0,
            "step": 0.25,
            "sample_step": 0.5,
            "obstacles": []
        }"#,
    )
    .unwrap();
    assert_eq!(request.row_step, Some(0.25));

    let store = Arc::new(InMemoryWorkAreaStore::new());
    let submission = service(store).submit_wall(request).await.unwrap();
    // Four rows of five samples.
    assert_eq!(submission.points_count, 20);
}

#[tokio::test]
async fn test_invalid_requests_store_nothing() {
    let store = Arc::new(InMemoryWorkAreaStore::new());
    let service = service(store.clone());

    let unnamed = WallRequest::new("  ", 2.0, 1.0);
    assert!(matches!(
        service.submit_wall(unnamed).await,
        Err(ApplicationError::Domain(DomainError::InvalidArgument { .. }))
    ));

    let flat_wall = WallRequest::new("flat", 2.0, 0.0);
    assert!(matches!(
        service.submit_wall(flat_wall).await,
        Err(ApplicationError::Domain(DomainError::InvalidArgument { .. }))
    ));

    let mut bad_step = WallRequest::new("bad step", 2.0, 1.0);
    bad_step.sample_step = Some(-0.1);
    assert!(matches!(
        service.submit_wall(bad_step).await,
        Err(ApplicationError::Domain(DomainError::InvalidArgument { .. }))
    ));

    let bad_obstacle =
        WallRequest::new("bad obstacle", 2.0, 1.0).with_obstacle(Obstacle::new(1.0, 0.5, -1.0, 0.2));
    assert!(service.submit_wall(bad_obstacle).await.is_err());

    assert!(store.list_obstacles(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_plan_stores_nothing() {
    let store = Arc::new(InMemoryWorkAreaStore::new());
    let params = PlanningParams::new(1.0, 0.5, 0.08).with_boundary_policy(BoundaryPolicy::Reject);
    let planner = CoveragePlanner::new(params, init_noop_logger()).unwrap();
    let (tx, mut rx) = mpsc::channel(8);
    let service =
        CoveragePlanningService::new(store.clone(), planner, init_noop_logger()).with_events(tx);

    // The detour lane over the socket lies above the wall.
    assert!(matches!(
        service.submit_wall(scenario_request()).await,
        Err(ApplicationError::Domain(DomainError::DetourOutOfBounds { row_index: 0, .. }))
    ));
    drop(service);

    assert!(store.list_obstacles(None).await.unwrap().is_empty());
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_unknown_work_area_is_not_found() {
    let store = Arc::new(InMemoryWorkAreaStore::new());
    let service = service(store);
    let missing = WorkAreaId::new();

    assert!(matches!(
        service.trajectory(missing).await,
        Err(ApplicationError::Domain(DomainError::NotFound { .. }))
    ));
    assert!(matches!(
        service.preview(missing).await,
        Err(ApplicationError::Domain(DomainError::NotFound { .. }))
    ));
    assert!(matches!(
        service.obstacles(Some(missing)).await,
        Err(ApplicationError::Domain(DomainError::NotFound { .. }))
    ));
}

#[tokio::test]
async fn test_preview_of_submitted_wall() {
    let store = Arc::new(InMemoryWorkAreaStore::new());
    let service = service(store);
    let submission = service.submit_wall(scenario_request()).await.unwrap();

    let preview = service.preview(submission.work_area_id).await.unwrap();
    assert_eq!(preview.points.len(), 10);
    // Coverage segments ending on the socket's edges are hidden too.
    assert_eq!(preview.segments.len(), 5);
    assert_eq!(preview.hidden_segments(), 4);
    assert_eq!(preview.obstacles.len(), 1);
}
