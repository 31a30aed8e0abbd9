use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::scheduling::SchedulingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Past deadline: {0}")]
    PastDeadline(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound(what) => AppError::NotFound(what.to_string()),
            SchedulingError::InvalidInput(msg) => AppError::InvalidInput(msg),
            SchedulingError::Inactive => {
                AppError::InvalidInput("barber is not available for booking".into())
            }
            SchedulingError::Conflict => AppError::Conflict(
                "slot already taken, please pick another available time".into(),
            ),
            SchedulingError::Forbidden(msg) => AppError::Forbidden(msg),
            SchedulingError::PastDeadline => {
                AppError::PastDeadline("appointment start time has already passed".into())
            }
            SchedulingError::Store(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<validator::ValidationError> for AppError {
    fn from(err: validator::ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref err) => match err {
                DatabaseError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
                DatabaseError::Duplicate => (StatusCode::CONFLICT, "Resource already exists"),
                DatabaseError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input data"),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                ),
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Resource conflict"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Access denied"),
            AppError::PastDeadline(_) => (StatusCode::BAD_REQUEST, "Past deadline"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred",
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
