use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use crate::domain::errors::GatewayError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error rendered as `{"error": "..."}` with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match err {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::ClientUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Mcp(_) | GatewayError::Decode { .. } | GatewayError::DomainStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %err, "upstream request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
