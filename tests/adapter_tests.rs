use tempfile::tempdir;
use wall_finisher::adapters::outbound::{
    preview_to_geojson, write_geojson, FileWorkAreaStore, InMemoryWorkAreaStore,
};
use wall_finisher::domains::coverage::{
    drawable_segments, BoundingBox, MarkerCursor, Obstacle, PathPoint, TrajectoryPreview,
    WorkArea, WorkAreaId, WorkAreaStore,
};
use wall_finisher::DomainError;

fn sample_points() -> Vec<PathPoint> {
    vec![
        PathPoint::coverage(0.0, 0.5),
        PathPoint::coverage(0.8, 0.5),
        PathPoint::detour(0.74, 0.5),
        PathPoint::detour(0.74, 1.06),
        PathPoint::detour(1.26, 1.06),
        PathPoint::detour(1.26, 0.501),
        PathPoint::coverage(1.2, 0.5),
        PathPoint::coverage(2.0, 0.5),
    ]
}

#[tokio::test]
async fn test_file_store_roundtrip() {
    let dir = tempdir().unwrap();
    let store = FileWorkAreaStore::new(dir.path().join("areas"));
    let area = WorkArea::new(2.0, 1.0).unwrap();

    let id = store.create_work_area("kitchen", &area).await.unwrap();
    let obstacles = vec![Obstacle::named("socket", 1.0, 0.5, 0.4, 1.0), Obstacle::new(1.8, 0.2, 0.1, 0.1)];
    let stored = store.store_obstacles(id, &obstacles).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].bbox, obstacles[0].bounding_box());

    assert_eq!(store.store_path(id, &sample_points()).await.unwrap(), 8);
    // A second path replaces the first one.
    assert_eq!(store.store_path(id, &sample_points()[..3]).await.unwrap(), 3);

    let document = store.base_path().join(format!("{}.json", id));
    assert!(document.exists());

    let reopened = FileWorkAreaStore::new(store.base_path().to_path_buf());
    let record = reopened.load_trajectory(id).await.unwrap();
    assert_eq!(record.work_area.name, "kitchen");
    assert_eq!(record.area(), area);
    assert_eq!(record.obstacle_shapes(), obstacles);
    assert_eq!(record.path_points(), sample_points()[..3].to_vec());
}

#[tokio::test]
async fn test_file_store_lists_and_queries_obstacles() {
    let dir = tempdir().unwrap();
    let store = FileWorkAreaStore::new(dir.path());
    let area = WorkArea::new(3.0, 2.0).unwrap();

    let first = store.create_work_area("first", &area).await.unwrap();
    let second = store.create_work_area("second", &area).await.unwrap();
    store.store_obstacles(first, &[Obstacle::new(0.5, 0.5, 0.2, 0.2)]).await.unwrap();
    store
        .store_obstacles(second, &[Obstacle::new(2.5, 1.5, 0.2, 0.2), Obstacle::new(0.5, 1.5, 0.2, 0.2)])
        .await
        .unwrap();

    assert_eq!(store.list_obstacles(None).await.unwrap().len(), 3);
    assert_eq!(store.list_obstacles(Some(second)).await.unwrap().len(), 2);

    let region = BoundingBox { min_x: 2.0, max_x: 3.0, min_y: 1.0, max_y: 2.0 };
    let hits = store.obstacles_in_region(second, region).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!((hits[0].obstacle.x - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_file_store_unknown_id() {
    let dir = tempdir().unwrap();
    let store = FileWorkAreaStore::new(dir.path());
    let missing = WorkAreaId::new();
    assert!(matches!(
        store.load_trajectory(missing).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        store.store_path(missing, &sample_points()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[test]
fn test_memory_store_region_query_counts_touching_boxes() {
    tokio_test::block_on(async {
        let store = InMemoryWorkAreaStore::new();
        let id = store.create_work_area("lab", &WorkArea::new(4.0, 2.0).unwrap()).await.unwrap();
        store
            .store_obstacles(
                id,
                &[
                    Obstacle::new(1.0, 1.0, 0.5, 0.5),
                    Obstacle::new(3.0, 1.0, 0.5, 0.5),
                ],
            )
            .await
            .unwrap();

        // Right edge of the region touches the left edge of the first obstacle.
        let region = BoundingBox { min_x: 0.0, max_x: 0.75, min_y: 0.0, max_y: 2.0 };
        let hits = store.obstacles_in_region(id, region).await.unwrap();
        assert_eq!(hits.len(), 1);

        let everything = store.obstacles_in_region(id, BoundingBox { min_x: 0.0, max_x: 4.0, min_y: 0.0, max_y: 2.0 });
        assert_eq!(everything.await.unwrap().len(), 2);

        assert!(matches!(
            store.list_obstacles(Some(WorkAreaId::new())).await,
            Err(DomainError::NotFound { .. })
        ));
    });
}

#[test]
fn test_drawable_segments_hide_segments_through_obstacles() {
    let obstacle = Obstacle::new(1.0, 0.5, 0.4, 1.0);
    let straight = vec![PathPoint::coverage(0.0, 0.5), PathPoint::coverage(2.0, 0.5)];
    assert!(drawable_segments(&straight, &[obstacle.clone()]).is_empty());

    // Ending on the obstacle edge counts as a hit.
    let touching = vec![PathPoint::coverage(0.0, 0.5), PathPoint::coverage(0.8, 0.5)];
    assert!(drawable_segments(&touching, &[obstacle.clone()]).is_empty());

    let clear = vec![PathPoint::coverage(0.0, 0.5), PathPoint::coverage(0.79, 0.5)];
    assert_eq!(drawable_segments(&clear, &[obstacle.clone()]).len(), 1);

    // Only the three perimeter legs of the detour stay clear of the edges.
    let routed = sample_points();
    let drawn = drawable_segments(&routed, &[obstacle]);
    assert_eq!(drawn.len(), 3);
    assert_eq!(drawn[0].from, PathPoint::detour(0.74, 0.5));
    assert_eq!(drawn[2].to, PathPoint::detour(1.26, 0.501));
}

#[test]
fn test_marker_cursor_wraps_and_pauses() {
    let points = sample_points();
    let mut cursor = MarkerCursor::new(2.5);
    assert_eq!(cursor.current(&points), Some(&points[0]));

    cursor.tick(points.len());
    assert_eq!(cursor.index(), 2);
    cursor.tick(points.len());
    assert_eq!(cursor.index(), 5);

    cursor.toggle_pause();
    assert!(cursor.is_paused());
    cursor.tick(points.len());
    assert_eq!(cursor.index(), 5);
    cursor.toggle_pause();

    cursor.tick(points.len());
    assert_eq!(cursor.index(), 7);
    cursor.tick(points.len());
    assert_eq!(cursor.index(), 0);
    assert_eq!(cursor.current(&[]), None);
}

fn sample_preview() -> TrajectoryPreview {
    let area = WorkArea::new(2.0, 1.0).unwrap();
    let obstacles = vec![Obstacle::named("socket", 1.0, 0.5, 0.4, 1.0)];
    let points = sample_points();
    let segments = drawable_segments(&points, &obstacles);
    TrajectoryPreview { area, obstacles, points, segments }
}

#[test]
fn test_geojson_layers() {
    let geojson = preview_to_geojson(&sample_preview());
    let value: serde_json::Value = serde_json::from_str(&geojson.to_string()).unwrap();
    assert_eq!(value["type"], "FeatureCollection");

    let features = value["features"].as_array().unwrap();
    let layers: Vec<&str> = features
        .iter()
        .map(|f| f["properties"]["layer"].as_str().unwrap())
        .collect();
    assert_eq!(layers, vec!["work_area", "obstacle", "path", "detours"]);

    assert_eq!(features[1]["properties"]["name"], "socket");
    assert_eq!(features[2]["geometry"]["type"], "LineString");
    assert_eq!(features[2]["geometry"]["coordinates"].as_array().unwrap().len(), 8);
    assert_eq!(features[3]["geometry"]["coordinates"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_write_geojson_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("preview.geojson");
    write_geojson(&sample_preview(), &out).await.unwrap();

    let body = std::fs::read_to_string(&out).unwrap();
    let parsed: geojson::GeoJson = body.parse().unwrap();
    assert!(matches!(parsed, geojson::GeoJson::FeatureCollection(fc) if fc.features.len() == 4));
}
