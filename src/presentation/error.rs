// JSON error envelope and status mapping for the HTTP boundary
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::application::error::ServiceError;
use crate::domain::error::RouteDataError;

/// Boundary error type. Every failure leaves the service as
/// `{"error": "..."}` with a status the taxonomy below assigns.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Service(service) => match service {
                ServiceError::RouteNotFound(id) => {
                    (StatusCode::NOT_FOUND, format!("route {id} not found"))
                }
                ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                ServiceError::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    "invalid username or password".to_string(),
                ),
                ServiceError::Data(data) => classify_data_error(data),
                ServiceError::Internal(err) => {
                    tracing::error!(error = %err, "internal service error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "an internal error occurred".to_string(),
                    )
                }
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

/// Empty or malformed files are the client's fault; a file that is in
/// the table but unreadable is ours.
fn classify_data_error(err: &RouteDataError) -> (StatusCode, String) {
    match err {
        RouteDataError::EmptyRoute => {
            (StatusCode::BAD_REQUEST, "route file is empty".to_string())
        }
        RouteDataError::Parse { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        RouteDataError::Io(io_err) => {
            tracing::error!(error = %io_err, "route file read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read route file".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ApiError::Service(ServiceError::RouteNotFound(7))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Service(ServiceError::Data(
                RouteDataError::EmptyRoute
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Service(ServiceError::Data(
                RouteDataError::Parse {
                    line: 2,
                    reason: "bad cell".to_string()
                }
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Service(ServiceError::Data(RouteDataError::Io(
                std::io::Error::new(std::io::ErrorKind::NotFound, "gone")
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::Service(ServiceError::Conflict("dup".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Service(ServiceError::Unauthorized)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::BadRequest("no ids".into())),
            StatusCode::BAD_REQUEST
        );
    }
}
