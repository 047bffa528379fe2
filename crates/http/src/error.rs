//! Error handling for the BookList HTTP layer

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Body for errors that carry only a message
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// The record failed validation; `record` is its serialized form with `errors`.
    #[error("unprocessable entity")]
    Unprocessable { record: serde_json::Value },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error carrying the offending record
    pub fn unprocessable(record: serde_json::Value) -> Self {
        Self::Unprocessable { record }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unprocessable { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();
        let error_code = self.code();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code,
                status_code = %status.as_u16(),
                error = %self,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        match self {
            AppError::Unprocessable { record } => (status, Json(record)).into_response(),
            AppError::NotFound { message } | AppError::BadRequest { message } => {
                (status, Json(MessageBody { message })).into_response()
            }
            AppError::Internal(e) => {
                // Hide internal details outside debug builds
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                (status, Json(MessageBody { message })).into_response()
            }
        }
    }
}
