//! quizhub — API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quizhub_core::error::DomainError;
use quizhub_inference::InferenceError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Tracing or exporter setup failure.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: &'static str,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A domain failure, mapped by kind.
    Domain(DomainError),
    /// The inference service failed or answered with garbage.
    Inference(InferenceError),
    /// A session code or player id in the request body did not resolve.
    /// Reported as 400 rather than 404 on the join and submit endpoints.
    InvalidReference(&'static str),
    /// The request body was not JSON of the expected shape.
    MalformedBody(String),
}

impl ApiError {
    /// Re-maps lookup failures to [`ApiError::InvalidReference`] with the
    /// given message; other errors pass through unchanged.
    pub fn lookup_as_bad_request(message: &'static str) -> impl Fn(DomainError) -> Self {
        move |err| {
            if err.is_not_found() {
                Self::InvalidReference(message)
            } else {
                Self::Domain(err)
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        Self::Inference(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Domain(DomainError::SessionNotFound(_)) => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                "Session not found".to_owned(),
            ),
            Self::Domain(DomainError::PlayerNotFound(_)) => (
                StatusCode::NOT_FOUND,
                "player_not_found",
                "Player not found".to_owned(),
            ),
            Self::Domain(DomainError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg)
            }
            Self::Domain(err @ DomainError::Conflict(_)) => {
                (StatusCode::CONFLICT, "conflict", err.to_string())
            }
            Self::Domain(err @ DomainError::Infrastructure(_)) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "infrastructure_error",
                    err.to_string(),
                )
            }
            Self::Inference(err) => {
                tracing::error!(error = %err, "inference request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error", err.to_string())
            }
            Self::InvalidReference(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_reference", msg.to_owned())
            }
            Self::MalformedBody(msg) => (StatusCode::BAD_REQUEST, "invalid_body", msg),
        };

        let body = ErrorBody {
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}
