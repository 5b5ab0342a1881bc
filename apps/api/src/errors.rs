use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::recommendation::recommender::RecommendError;
use crate::session::store::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Already answered: {0}")]
    AlreadyAnswered(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => AppError::SessionNotFound(id.to_string()),
            SessionError::AlreadyAnswered(id) => AppError::AlreadyAnswered(id.to_string()),
        }
    }
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Upstream(msg) => AppError::UpstreamUnavailable(msg),
            RecommendError::Schema(msg) => AppError::SchemaViolation(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::SessionNotFound(_) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found or expired.".to_string(),
            ),
            AppError::AlreadyAnswered(_) => (
                StatusCode::CONFLICT,
                "ALREADY_ANSWERED",
                "Answers have already been submitted for this session.".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Recommendation upstream error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_UNAVAILABLE",
                    "AI recommendation failed.".to_string(),
                )
            }
            AppError::SchemaViolation(msg) => {
                tracing::error!("Recommendation schema violation: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCHEMA_VIOLATION",
                    "AI recommendation failed.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "code": code,
            "message": message
        }));

        (status, body).into_response()
    }
}
