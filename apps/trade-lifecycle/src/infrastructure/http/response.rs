//! HTTP response DTOs.

use std::collections::BTreeMap;

use axum::{Json, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorCode};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false.
    pub ok: bool,
    /// Error details.
    pub error: ErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Additional context.
    pub context: BTreeMap<String, String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(error: &ApiError) -> Self {
        Self {
            ok: false,
            error: ErrorBody {
                code: error.code(),
                message: error.message().to_string(),
                context: error.context().clone(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code().http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.code(), error = %self.message(), "Request failed");
        } else {
            tracing::debug!(code = %self.code(), error = %self.message(), "Request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
