use crate::domains::logger::{DomainLogger, DynLogger};
use once_cell::sync::OnceCell;
use std::sync::Arc;

const DOMAIN_TARGET: &str = "wall_finisher::domain";

/// Forwards domain messages to the process `tracing` subscriber.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: DOMAIN_TARGET, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: DOMAIN_TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: DOMAIN_TARGET, "{}", msg);
    }
}

pub fn init_console_logger() -> DynLogger {
    Arc::new(TracingBridge)
}

struct NoOp;

impl DomainLogger for NoOp {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// No-op logger useful as default in unit tests
pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoOp)
}

// fast_log installs the global `log` backend, which can only happen once.
static PLAN_LOG_PATH: OnceCell<String> = OnceCell::new();

/// Plan log file written by fast_log through the `log` macros.
struct PlanLogFile;

impl DomainLogger for PlanLogFile {
    fn info(&self, msg: &str) {
        log::info!(target: DOMAIN_TARGET, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: DOMAIN_TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: DOMAIN_TARGET, "{}", msg);
    }
}

/// Open the plan log at `path`. Opening the same file again is a no-op, any other
/// file is an error once a log is active.
pub fn init_file_logger(path: &str) -> Result<DynLogger, String> {
    let active = PLAN_LOG_PATH
        .get_or_try_init(|| {
            fast_log::init(
                fast_log::config::Config::new()
                    .file(path)
                    .level(log::LevelFilter::Info),
            )
            .map(|_| path.to_string())
        })
        .map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    if active.as_str() != path {
        return Err(format!("plan log already writing to {}", active));
    }
    Ok(Arc::new(PlanLogFile))
}

/// Sends each message to every sink in order.
pub struct FanOutLogger {
    sinks: Vec<DynLogger>,
}

impl FanOutLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn with(mut self, sink: DynLogger) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DomainLogger for FanOutLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// Console logging, plus the plan log file when `path` is given and can be opened.
pub fn init_domain_logger(path: Option<&str>) -> DynLogger {
    let console = init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match init_file_logger(path) {
        Ok(file) => Arc::new(FanOutLogger::new(vec![file, console])),
        Err(e) => {
            console.warn(&format!("{}; logging to the console only", e));
            console
        }
    }
}
