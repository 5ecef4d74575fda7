use crate::common::{DomainError, DomainResult};
use crate::config::PostgresConfig;
use crate::domains::coverage::{
    BoundingBox, Obstacle, ObstacleRecord, PathPoint, PointKind, StoredPoint, TrajectoryRecord,
    WorkArea, WorkAreaId, WorkAreaRecord, WorkAreaStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS work_areas (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        width DOUBLE PRECISION NOT NULL,
        height DOUBLE PRECISION NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );

    CREATE TABLE IF NOT EXISTS obstacles (
        id UUID PRIMARY KEY,
        seq BIGSERIAL,
        work_area_id UUID NOT NULL REFERENCES work_areas(id) ON DELETE CASCADE,
        name TEXT,
        x DOUBLE PRECISION NOT NULL,
        y DOUBLE PRECISION NOT NULL,
        w DOUBLE PRECISION NOT NULL,
        h DOUBLE PRECISION NOT NULL,
        min_x DOUBLE PRECISION NOT NULL,
        max_x DOUBLE PRECISION NOT NULL,
        min_y DOUBLE PRECISION NOT NULL,
        max_y DOUBLE PRECISION NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_obstacles_box
    ON obstacles (work_area_id, min_x, max_x, min_y, max_y);

    CREATE TABLE IF NOT EXISTS path_points (
        work_area_id UUID NOT NULL REFERENCES work_areas(id) ON DELETE CASCADE,
        ord BIGINT NOT NULL,
        x DOUBLE PRECISION NOT NULL,
        y DOUBLE PRECISION NOT NULL,
        kind TEXT NOT NULL,
        PRIMARY KEY (work_area_id, ord)
    );
"#;

const OBSTACLE_COLUMNS: &str =
    "id, work_area_id, name, x, y, w, h, min_x, max_x, min_y, max_y";

fn pg_err(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::InfrastructureError(format!("{}: {}", context, e))
}

fn pool_config(config: PostgresConfig) -> Config {
    let mut pg_config = Config::new();
    pg_config.host = Some(config.host);
    pg_config.port = Some(config.port);
    pg_config.dbname = Some(config.database);
    pg_config.user = Some(config.username);
    pg_config.password = Some(config.password);
    pg_config.pool = Some(PoolConfig::new(config.max_connections as usize));
    pg_config
}

fn kind_label(kind: PointKind) -> &'static str {
    match kind {
        PointKind::Coverage => "coverage",
        PointKind::Detour => "detour",
    }
}

fn parse_kind(label: &str) -> DomainResult<PointKind> {
    match label {
        "coverage" => Ok(PointKind::Coverage),
        "detour" => Ok(PointKind::Detour),
        other => Err(DomainError::InfrastructureError(format!(
            "unknown point kind in path_points: {}",
            other
        ))),
    }
}

fn obstacle_from_row(row: &Row) -> ObstacleRecord {
    ObstacleRecord {
        id: row.get(0),
        work_area_id: WorkAreaId(row.get(1)),
        obstacle: Obstacle {
            name: row.get(2),
            x: row.get(3),
            y: row.get(4),
            w: row.get(5),
            h: row.get(6),
        },
        bbox: BoundingBox {
            min_x: row.get(7),
            max_x: row.get(8),
            min_y: row.get(9),
            max_y: row.get(10),
        },
    }
}

/// PostgreSQL-backed store. Obstacle boxes are kept as plain columns under a
/// composite index so region queries stay on the index.
pub struct PostgresWorkAreaStore {
    pool: Pool,
}

impl PostgresWorkAreaStore {
    pub async fn new(config: PostgresConfig) -> DomainResult<Self> {
        let pool = pool_config(config)
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| pg_err("Failed to create PostgreSQL pool", e))?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: Pool) -> DomainResult<Self> {
        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn client(&self) -> DomainResult<deadpool_postgres::Client> {
        self.pool
            .get()
            .await
            .map_err(|e| pg_err("Failed to get database connection", e))
    }

    async fn initialize_schema(&self) -> DomainResult<()> {
        let client = self.client().await?;
        client
            .batch_execute(SCHEMA)
            .await
            .map_err(|e| pg_err("Failed to initialize database schema", e))
    }

    async fn ensure_exists(client: &tokio_postgres::Client, id: WorkAreaId) -> DomainResult<()> {
        let row = client
            .query_opt("SELECT 1 FROM work_areas WHERE id = $1", &[&id.0])
            .await
            .map_err(|e| pg_err("Failed to look up work area", e))?;
        match row {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound { id: id.to_string() }),
        }
    }
}

#[async_trait]
impl WorkAreaStore for PostgresWorkAreaStore {
    async fn create_work_area(&self, name: &str, area: &WorkArea) -> DomainResult<WorkAreaId> {
        let client = self.client().await?;
        let id = WorkAreaId::new();
        let created_at: DateTime<Utc> = Utc::now();
        client
            .execute(
                "INSERT INTO work_areas (id, name, width, height, created_at) VALUES ($1, $2, $3, $4, $5)",
                &[&id.0, &name, &area.width, &area.height, &created_at],
            )
            .await
            .map_err(|e| pg_err("Failed to insert work area", e))?;
        Ok(id)
    }

    async fn store_obstacles(
        &self,
        id: WorkAreaId,
        obstacles: &[Obstacle],
    ) -> DomainResult<Vec<ObstacleRecord>> {
        let mut client = self.client().await?;
        Self::ensure_exists(&client, id).await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| pg_err("Failed to begin transaction", e))?;

        let stmt = tx
            .prepare(
                "INSERT INTO obstacles (id, work_area_id, name, x, y, w, h, min_x, max_x, min_y, max_y)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .await
            .map_err(|e| pg_err("Failed to prepare statement", e))?;

        let mut records = Vec::with_capacity(obstacles.len());
        for obstacle in obstacles {
            let record = ObstacleRecord::new(id, obstacle.clone());
            let b = record.bbox;
            tx.execute(
                &stmt,
                &[
                    &record.id,
                    &id.0,
                    &record.obstacle.name,
                    &record.obstacle.x,
                    &record.obstacle.y,
                    &record.obstacle.w,
                    &record.obstacle.h,
                    &b.min_x,
                    &b.max_x,
                    &b.min_y,
                    &b.max_y,
                ],
            )
            .await
            .map_err(|e| pg_err("Failed to insert obstacle", e))?;
            records.push(record);
        }

        tx.commit()
            .await
            .map_err(|e| pg_err("Failed to commit obstacles", e))?;
        Ok(records)
    }

    async fn store_path(&self, id: WorkAreaId, points: &[PathPoint]) -> DomainResult<usize> {
        let mut client = self.client().await?;
        Self::ensure_exists(&client, id).await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| pg_err("Failed to begin transaction", e))?;

        tx.execute("DELETE FROM path_points WHERE work_area_id = $1", &[&id.0])
            .await
            .map_err(|e| pg_err("Failed to clear previous path", e))?;

        let stmt = tx
            .prepare("INSERT INTO path_points (work_area_id, ord, x, y, kind) VALUES ($1, $2, $3, $4, $5)")
            .await
            .map_err(|e| pg_err("Failed to prepare statement", e))?;
        for (ord, point) in points.iter().enumerate() {
            tx.execute(
                &stmt,
                &[&id.0, &(ord as i64), &point.x, &point.y, &kind_label(point.kind)],
            )
            .await
            .map_err(|e| pg_err("Failed to insert path point", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| pg_err("Failed to commit path", e))?;
        Ok(points.len())
    }

    async fn load_trajectory(&self, id: WorkAreaId) -> DomainResult<TrajectoryRecord> {
        let client = self.client().await?;
        let meta = client
            .query_opt(
                "SELECT id, name, width, height, created_at FROM work_areas WHERE id = $1",
                &[&id.0],
            )
            .await
            .map_err(|e| pg_err("Failed to load work area", e))?
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;

        let work_area = WorkAreaRecord {
            id: WorkAreaId(meta.get::<_, Uuid>(0)),
            name: meta.get(1),
            width: meta.get(2),
            height: meta.get(3),
            created_at: meta.get(4),
        };

        let obstacles = client
            .query(
                &format!(
                    "SELECT {} FROM obstacles WHERE work_area_id = $1 ORDER BY seq ASC",
                    OBSTACLE_COLUMNS
                ),
                &[&id.0],
            )
            .await
            .map_err(|e| pg_err("Failed to load obstacles", e))?
            .iter()
            .map(obstacle_from_row)
            .collect();

        let rows = client
            .query(
                "SELECT ord, x, y, kind FROM path_points WHERE work_area_id = $1 ORDER BY ord ASC",
                &[&id.0],
            )
            .await
            .map_err(|e| pg_err("Failed to load path points", e))?;
        let points = rows
            .iter()
            .map(|row| {
                Ok(StoredPoint {
                    ord: row.get::<_, i64>(0) as usize,
                    x: row.get(1),
                    y: row.get(2),
                    kind: parse_kind(row.get::<_, &str>(3))?,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(TrajectoryRecord { work_area, obstacles, points })
    }

    async fn obstacles_in_region(
        &self,
        id: WorkAreaId,
        region: BoundingBox,
    ) -> DomainResult<Vec<ObstacleRecord>> {
        let client = self.client().await?;
        Self::ensure_exists(&client, id).await?;
        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM obstacles
                     WHERE work_area_id = $1 AND min_x <= $2 AND max_x >= $3 AND min_y <= $4 AND max_y >= $5
                     ORDER BY seq ASC",
                    OBSTACLE_COLUMNS
                ),
                &[&id.0, &region.max_x, &region.min_x, &region.max_y, &region.min_y],
            )
            .await
            .map_err(|e| pg_err("Failed to query obstacles", e))?;
        Ok(rows.iter().map(obstacle_from_row).collect())
    }

    async fn list_obstacles(&self, id: Option<WorkAreaId>) -> DomainResult<Vec<ObstacleRecord>> {
        let client = self.client().await?;
        let rows = match id {
            Some(id) => {
                Self::ensure_exists(&client, id).await?;
                client
                    .query(
                        &format!(
                            "SELECT {} FROM obstacles WHERE work_area_id = $1 ORDER BY seq ASC",
                            OBSTACLE_COLUMNS
                        ),
                        &[&id.0],
                    )
                    .await
            }
            None => {
                client
                    .query(
                        &format!("SELECT {} FROM obstacles ORDER BY seq ASC", OBSTACLE_COLUMNS),
                        &[],
                    )
                    .await
            }
        }
        .map_err(|e| pg_err("Failed to list obstacles", e))?;
        Ok(rows.iter().map(obstacle_from_row).collect())
    }
}
