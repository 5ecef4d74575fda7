use crate::domains::coverage::{BoundaryPolicy, PlanningParams};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub postgres: PostgresConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub row_step: f64,
    pub sample_step: f64,
    pub margin: f64,
    #[serde(default)]
    pub boundary_policy: BoundaryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    File,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Domain log file; console logging when absent.
    pub file: Option<String>,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub filter: String,
}

impl PlannerConfig {
    pub fn params(&self) -> PlanningParams {
        PlanningParams::new(self.row_step, self.sample_step, self.margin)
            .with_boundary_policy(self.boundary_policy)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let params = PlanningParams::default();
        Self {
            row_step: params.row_step,
            sample_step: params.sample_step,
            margin: params.margin,
            boundary_policy: params.boundary_policy,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("data/work_areas"),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "wall_finisher".to_string(),
            username: "postgres".to_string(),
            password: "password".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            storage: StorageConfig::default(),
            postgres: PostgresConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, then the TOML file at `path` if present, then
    /// `WALL_FINISHER__<SECTION>__<KEY>` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Config::default())
            .context("failed to serialize default configuration")?;
        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        let layered = builder
            .add_source(
                ::config::Environment::with_prefix("WALL_FINISHER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to assemble configuration")?;
        layered
            .try_deserialize()
            .context("invalid configuration")
    }
}
