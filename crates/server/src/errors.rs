use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

/// Uniform JSON error body: `{"error": ..., "message": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl JsonApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, error: "bad_request", message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, error: "not_found", message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, error: "unauthorized", message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal",
            message: message.into(),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error = self.error, message = %self.message, "request failed");
        }
        let body = serde_json::json!({"error": self.error, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "validation",
                message: msg,
            },
            ServiceError::Model(inner) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "validation",
                message: inner.to_string(),
            },
            ServiceError::NotFound(msg) => Self {
                status: StatusCode::NOT_FOUND,
                error: "not_found",
                message: msg,
            },
            ServiceError::Conflict(msg) => Self {
                status: StatusCode::CONFLICT,
                error: "conflict",
                message: msg,
            },
            ServiceError::Db(msg) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "database",
                message: msg,
            },
            ServiceError::Crypto(msg) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "encryption",
                message: msg,
            },
            ServiceError::Render(msg) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "render",
                message: msg,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
