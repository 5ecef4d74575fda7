use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wall_finisher::adapters::outbound::{
    init_domain_logger, write_geojson, FileWorkAreaStore, InMemoryWorkAreaStore,
    PostgresWorkAreaStore,
};
use wall_finisher::application::{CoveragePlanningService, WallRequest};
use wall_finisher::config::StorageBackend;
use wall_finisher::domains::coverage::{CoveragePlanner, WorkAreaStore};
use wall_finisher::{Config, EventEnvelope};

const USAGE: &str = "usage: wall-finisher <request.json> [--config <path>] [--geojson <out.json>]";

struct Args {
    request: PathBuf,
    config: Option<PathBuf>,
    geojson: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut request = None;
    let mut config = None;
    let mut geojson = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context(USAGE)?.into()),
            "--geojson" => geojson = Some(args.next().context(USAGE)?.into()),
            "-h" | "--help" => bail!(USAGE),
            _ if request.is_none() => request = Some(PathBuf::from(arg)),
            other => bail!("unexpected argument {}\n{}", other, USAGE),
        }
    }
    Ok(Args { request: request.context(USAGE)?, config, geojson })
}

async fn build_store(config: &Config) -> Result<Arc<dyn WorkAreaStore>> {
    let store: Arc<dyn WorkAreaStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryWorkAreaStore::new()),
        StorageBackend::File => {
            tokio::fs::create_dir_all(&config.storage.data_dir).await?;
            Arc::new(FileWorkAreaStore::new(config.storage.data_dir.clone()))
        }
        StorageBackend::Postgres => {
            Arc::new(PostgresWorkAreaStore::new(config.postgres.clone()).await?)
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let config = Config::load(args.config.as_deref())?;

    // fast_log owns the global `log` backend, so it goes first and tracing
    // is installed without the log bridge.
    let logger = init_domain_logger(config.logging.file.as_deref());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt().with_env_filter(filter).finish(),
    )?;

    info!("Starting wall-finisher");
    info!("Storage backend: {:?}", config.storage.backend);

    let body = tokio::fs::read_to_string(&args.request)
        .await
        .with_context(|| format!("failed to read {}", args.request.display()))?;
    let request: WallRequest = serde_json::from_str(&body)?;

    let store = build_store(&config).await?;
    let planner = CoveragePlanner::new(config.planner.params(), logger.clone())?;

    let (event_sender, mut event_receiver) = mpsc::channel(100);
    let drain = tokio::spawn(async move {
        while let Some(event) = event_receiver.recv().await {
            match EventEnvelope::new(&event).and_then(|e| serde_json::to_string(&e)) {
                Ok(json) => info!(target: "wall_finisher::events", "{}", json),
                Err(e) => error!("Failed to serialize event: {}", e),
            }
        }
    });

    let service = CoveragePlanningService::new(store, planner, logger).with_events(event_sender);
    let submission = service.submit_wall(request).await?;

    println!("work_area_id: {}", submission.work_area_id);
    println!("points_count: {}", submission.points_count);
    println!("detour_points: {}", submission.detour_points);
    println!("obstacles: {}", submission.obstacles.len());

    if let Some(out) = &args.geojson {
        let preview = service.preview(submission.work_area_id).await?;
        write_geojson(&preview, out).await?;
        info!("GeoJSON preview written to {}", out.display());
    }

    drop(service);
    drain.await?;
    info!("Shutting down wall-finisher");
    Ok(())
}
