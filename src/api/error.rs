//! API error types.
//!
//! Failures are answered with a plain-text body. Query failures log the
//! underlying cause and return only a generic message.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::core_state::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A data-store read failed. `message` is what the client sees.
    #[error("{message}: {detail}")]
    Query {
        message: &'static str,
        detail: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn query(message: &'static str, cause: impl std::fmt::Display) -> Self {
        ApiError::Query {
            message,
            detail: cause.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Query { message, detail } => {
                tracing::error!(%detail, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::query("Internal error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn query_failure_returns_500_plain_text() {
        let response =
            ApiError::query("Failed to fetch patients", "no such table: patients").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        // Cause stays in the log, not the body
        assert_eq!(&body[..], b"Failed to fetch patients");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Medication not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Medication not found");
    }

    #[tokio::test]
    async fn core_error_maps_to_generic_500() {
        let api_err: ApiError = CoreError::LockPoisoned.into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Internal error");
    }
}
