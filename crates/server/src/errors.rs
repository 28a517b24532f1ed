use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use common::types::Mensaje;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

const INTERNAL_MESSAGE: &str = "Ha ocurrido un error";

/// HTTP error rendered as `{ "mensaje": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub mensaje: String,
}

impl ApiError {
    pub fn new(status: StatusCode, mensaje: impl Into<String>) -> Self {
        Self { status, mensaje: mensaje.into() }
    }

    pub fn bad_request(mensaje: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, mensaje)
    }

    pub fn unauthorized(mensaje: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, mensaje)
    }

    fn internal(detail: &dyn std::fmt::Display) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Mensaje::new(self.mensaje))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) | ServiceError::Persistence(m) => Self::bad_request(m),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            ServiceError::Conflict(m) => Self::new(StatusCode::CONFLICT, m),
            ServiceError::Db(detail) => Self::internal(&detail),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => Self::bad_request(m),
            AuthError::Conflict(m) => Self::new(StatusCode::CONFLICT, m),
            AuthError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            AuthError::Unauthorized(m) => Self::unauthorized(m),
            AuthError::Forbidden(m) => Self::new(StatusCode::FORBIDDEN, m),
            AuthError::HashError(detail) | AuthError::TokenError(detail) | AuthError::Repository(detail) => {
                Self::internal(&detail)
            }
        }
    }
}

/// Unreadable bodies are validation failures; only a missing JSON content
/// type keeps its own status.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
            return Self::new(rejection.status(), rejection.body_text());
        }
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("image host setup failed: {0}")]
    ImageHost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Persistence("p".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("c".into()), StatusCode::CONFLICT),
            (ServiceError::Db("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = ApiError::from(AuthError::Repository("password authentication failed for user".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.mensaje, INTERNAL_MESSAGE);
    }
}
