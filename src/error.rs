//! Error types for the figma-store application.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;

/// Application-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database error
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Figma API error
    #[error("Figma API error ({status}): {message}")]
    FigmaApi { status: u16, message: String },

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violation: {}", detail);
                AppError::Conflict("record already exists".to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::FigmaApi { .. } | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                e.to_string()
            }
            AppError::FigmaApi { status, message } => {
                tracing::error!("Figma API error: status={}, message={}", status, message);
                message.clone()
            }
            AppError::HttpClient(e) => {
                tracing::error!("HTTP client error: {}", e);
                e.to_string()
            }
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                msg.clone()
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                msg.clone()
            }
            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                msg.clone()
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                e.to_string()
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                e.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                msg.clone()
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
