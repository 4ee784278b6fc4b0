//! Error taxonomy shared by the driver.
//!
//! Every failure surfaced by the administrative connector or the lifecycle
//! manager is one of these kinds. The HTTP layer maps each kind to a status
//! code and a stable machine-readable code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::response::ApiResponse;

/// Result alias used throughout the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Classified driver errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// The administrative connection could not be established.
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// The catalog query or row iteration failed.
    #[error("Query failure: {0}")]
    QueryFailure(String),

    /// The database already exists.
    #[error("Database already exists: {0}")]
    AlreadyExists(String),

    /// The database does not exist.
    #[error("Database not found: {0}")]
    NotFound(String),

    /// The caller supplied an unusable argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Any DDL failure that is not otherwise classified.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ConnectionFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::QueryFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for the response envelope.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ConnectionFailure(_) => "CONNECTION_FAILURE",
            AppError::QueryFailure(_) => "QUERY_FAILURE",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        let body = ApiResponse::err(self.error_code(), self.to_string());
        (status, Json(body)).into_response()
    }
}
