use crate::common::{DomainError, DomainResult};
use crate::domains::coverage::{BoundingBox, PointKind, TrajectoryPreview};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use std::path::Path;

fn rectangle(b: &BoundingBox) -> Value {
    Value::Polygon(vec![vec![
        vec![b.min_x, b.min_y],
        vec![b.max_x, b.min_y],
        vec![b.max_x, b.max_y],
        vec![b.min_x, b.max_y],
        vec![b.min_x, b.min_y],
    ]])
}

fn feature(value: Value, properties: serde_json::Value) -> Feature {
    let properties: Option<JsonObject> = match properties {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties,
        foreign_members: None,
    }
}

/// Work area outline, obstacle rectangles, the path as one LineString and the
/// detour waypoints as a MultiPoint, in wall coordinates.
pub fn preview_to_geojson(preview: &TrajectoryPreview) -> GeoJson {
    let mut features = vec![feature(
        rectangle(&preview.area.bounds()),
        json!({ "layer": "work_area", "width": preview.area.width, "height": preview.area.height }),
    )];

    features.extend(preview.obstacles.iter().map(|o| {
        feature(
            rectangle(&o.bounding_box()),
            json!({ "layer": "obstacle", "name": o.name }),
        )
    }));

    if preview.points.len() >= 2 {
        features.push(feature(
            Value::LineString(preview.points.iter().map(|p| vec![p.x, p.y]).collect()),
            json!({
                "layer": "path",
                "points": preview.points.len(),
                "hidden_segments": preview.hidden_segments(),
            }),
        ));
    }

    let detours: Vec<Vec<f64>> = preview
        .points
        .iter()
        .filter(|p| p.kind == PointKind::Detour)
        .map(|p| vec![p.x, p.y])
        .collect();
    if !detours.is_empty() {
        features.push(feature(Value::MultiPoint(detours), json!({ "layer": "detours" })));
    }

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

pub async fn write_geojson(preview: &TrajectoryPreview, path: &Path) -> DomainResult<()> {
    let body = preview_to_geojson(preview).to_string();
    tokio::fs::write(path, body).await.map_err(|e| {
        DomainError::InfrastructureError(format!("Failed to write {}: {}", path.display(), e))
    })
}
