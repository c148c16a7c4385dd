//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Every body carries `success: false` and a human-readable `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;
use crate::models::ValidationError;

pub const DUPLICATE_MESSAGE: &str = "Student ID or email already exists";
pub const PERSISTENCE_MESSAGE: &str = "Database operation failed";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Required fields missing (400)
    Validation(ValidationError),

    /// Uniqueness constraint hit (400)
    Duplicate,

    /// Storage failure (500, message exposed as `error`)
    Persistence { message: String },

    /// Anything unclassified (500, detail logged only)
    Internal { message: String },
}

/// JSON body shared by every failure response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Duplicate => StatusCode::BAD_REQUEST,
            Self::Persistence { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, error) = match self {
            Self::Validation(e) => (e.to_string(), None),
            Self::Duplicate => (DUPLICATE_MESSAGE.to_string(), None),
            Self::Persistence { message } => {
                (PERSISTENCE_MESSAGE.to_string(), Some(message.clone()))
            }
            Self::Internal { .. } => (INTERNAL_MESSAGE.to_string(), None),
        };
        ErrorBody {
            success: false,
            message,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(e) => tracing::warn!(fields = ?e.fields(), "Registration rejected"),
            Self::Duplicate => tracing::warn!("Duplicate registration rejected"),
            Self::Persistence { message } => tracing::error!("Database error: {}", message),
            // Log the actual error, return generic message
            Self::Internal { message } => tracing::error!("Server error: {}", message),
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Duplicate { message } => {
                tracing::debug!("Duplicate key: {}", message);
                Self::Duplicate
            }
            DbError::Persistence { message } => Self::Persistence { message },
        }
    }
}
