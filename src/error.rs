//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Contract does not belong to the authenticated client")]
    Ownership,

    #[error("Operation not allowed while contract status is {current}")]
    Conflict { current: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Client-correctable validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Validation failure carrying the specific values the caller needs to self-correct
    pub fn validation_with(message: impl Into<String>, details: serde_json::Value) -> Self {
        AppError::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Status-transition conflict naming the current status
    pub fn conflict(current: &str) -> Self {
        AppError::Conflict {
            current: current.to_string(),
        }
    }
}

/// JSON error body returned to API callers
#[derive(Debug, Serialize)]
struct ErrorBody {
    error_type: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, details) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::Validation { details, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation", details.clone())
            }
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated", None),
            AppError::Ownership => (StatusCode::FORBIDDEN, "ownership", None),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict", None),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        let message = match &self {
            // Never leak driver details to the caller
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error_type,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_names_current_status() {
        let err = AppError::conflict("pending_admin_review");
        assert!(err.to_string().contains("pending_admin_review"));
    }

    #[test]
    fn test_validation_carries_message() {
        let err = AppError::validation("dates outside window");
        assert_eq!(err.to_string(), "dates outside window");
    }
}
