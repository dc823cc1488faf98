use thiserror::Error;
use tk_core::{ExportError, ProjectError};

use crate::config::ConfigError;
use crate::services::ServiceError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the `tk` commands
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Member {0} is outside the array")]
    NoSuchMember(u32),

    #[error("Services are disabled in the configuration")]
    ServicesDisabled,
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}
