use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const USER_NOT_FOUND: &str = "User not found";
pub const EMAIL_TAKEN: &str = "Email address is already registered";
const INTERNAL: &str = "Internal server error";

/// Error response rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
#[error("{status}: {detail}")]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"detail": self.detail}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, msg),
            ServiceError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, USER_NOT_FOUND),
            ServiceError::Conflict(_) => ApiError::new(StatusCode::CONFLICT, EMAIL_TAKEN),
            ServiceError::Db(msg) => {
                error!(error = %msg, "database failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}
