use thiserror::Error;

use models::errors::ModelError;

/// Failure categories surfaced by the pet and image services. The message is
/// user-facing and ends up in the `mensaje` field of the response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A write completed without touching any row.
    #[error("{0}")]
    Persistence(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Db(e.to_string())
    }
}

impl ServiceError {
    /// Label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Persistence(_) => "persistence",
            ServiceError::Db(_) => "db",
        }
    }
}
