use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Work area not found: {id}")]
    NotFound { id: String },

    #[error("Detour waypoint ({x:.3}, {y:.3}) leaves the work area on row {row_index}")]
    DetourOutOfBounds { row_index: usize, x: f64, y: f64 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        DomainError::InvalidArgument { reason: reason.into() }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
