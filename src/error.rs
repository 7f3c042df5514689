use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::models::ConflictAxis;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid format for {field}: {value:?}")]
    InvalidFormat { field: &'static str, value: String },

    #[error("{0}")]
    Validation(String),

    #[error("{}", .0.conflict_message())]
    Conflict(ConflictAxis),

    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn invalid_format(field: &'static str, value: impl Into<String>) -> Self {
        AppError::InvalidFormat { field, value: value.into() }
    }

    /// Short machine-readable category, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "persistence",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidFormat { .. } => "format",
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidCsv(_) => "structure",
            AppError::BadRequest(_) => "bad_request",
        }
    }

    /// Message safe to hand back to a client. Database errors are masked.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Database error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    /// Per-item detail for batch reports. Database errors are logged and
    /// masked, as in the HTTP response.
    pub fn report_detail(&self) -> String {
        if let AppError::Database(e) = self {
            error!("database error: {}", e);
        }
        format!("{}: {}", self.kind(), self.public_message())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidFormat { .. } | AppError::Validation(_) | AppError::InvalidCsv(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_detail_masks_database_errors() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        let detail = err.report_detail();
        assert_eq!(detail, "persistence: Database error occurred");
        assert!(!detail.contains("RowNotFound"));
    }

    #[test]
    fn report_detail_keeps_business_messages() {
        let err = AppError::Conflict(ConflictAxis::Venue);
        assert_eq!(
            err.report_detail(),
            "conflict: the venue is already occupied at this time"
        );
    }
}
