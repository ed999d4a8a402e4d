// Error type shared by the use-case services
use thiserror::Error;

use crate::domain::error::RouteDataError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the application services. The presentation
/// layer owns the mapping onto HTTP status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("route {0} not found")]
    RouteNotFound(i64),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid credentials")]
    Unauthorized,

    /// A route file could not be read, parsed, or was empty.
    #[error(transparent)]
    Data(#[from] RouteDataError),

    /// Storage or other unexpected failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
