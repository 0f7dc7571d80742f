//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use channel::ChannelError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// The request body's declared content type is not accepted.
    UnsupportedMediaType(String),
    /// Channel boundary error.
    Channel(ChannelError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnsupportedMediaType(content_type) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("unsupported content type: {content_type}"),
            ),
            ApiError::Channel(err) => channel_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn channel_error_to_response(err: ChannelError) -> (StatusCode, String) {
    match &err {
        ChannelError::ChannelNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ChannelError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
        ChannelError::ReplicationFactor { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        ChannelError::PartitionOutOfRange { .. } | ChannelError::Serialization(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

impl From<ChannelError> for ApiError {
    fn from(err: ChannelError) -> Self {
        ApiError::Channel(err)
    }
}
