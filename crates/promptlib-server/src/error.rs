//! API error types.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptlib_core::{AuthError, ValidationError};
use promptlib_storage::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message sent to clients for any 500.
const INTERNAL_MESSAGE: &str = "internal server error";

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication required.
    #[error("authentication required")]
    Unauthorized,

    /// Authenticated, but not allowed to touch this resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The prompt is already in the user's saved list.
    #[error("prompt already saved")]
    AlreadySaved,

    /// Invalid input.
    #[error("bad request: {0}")]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Auth error.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Storage(StorageError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) | ApiError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            ApiError::AlreadySaved => (StatusCode::BAD_REQUEST, "already_saved"),
            ApiError::Auth(_) => (StatusCode::UNAUTHORIZED, "auth_failed"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        // Never leak store details to the client
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let err = ApiError::Storage(StorageError::Config("disk on fire".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], INTERNAL_MESSAGE);
        assert_eq!(json["code"], "storage_error");
    }

    #[tokio::test]
    async fn test_storage_not_found_is_404() {
        let err = ApiError::Storage(StorageError::NotFound("prompt 3".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_already_saved_code() {
        let response = ApiError::AlreadySaved.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "already_saved");
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let err = ApiError::from(ValidationError::MissingField("title"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "bad request: field 'title' is required");
    }

    #[tokio::test]
    async fn test_auth_failure_is_401() {
        let err = ApiError::from(AuthError::DomainRejected("x@other.com".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
