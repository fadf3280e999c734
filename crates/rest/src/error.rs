//! Error types for the REST API.
//!
//! Every failure is rendered as a JSON body of the form
//! `{"error": {"code": "...", "message": "..."}}`.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | UnknownResource | 404 | unknown-resource |
//! | NotFound | 404 | not-found |
//! | DuplicateKey | 500 | duplicate-key |
//! | InvalidRecord | 400 | invalid-record |
//! | Backend | 500 | backend-error |
//!
//! A colliding id on create is a 500, not a 409.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use placeholder_persistence::StorageError;
use thiserror::Error;

/// The error type for REST API operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// The collection name is not configured (HTTP 404).
    #[error("Unknown resource: {resource}")]
    UnknownResource {
        /// The requested collection.
        resource: String,
    },

    /// No record with that id (HTTP 404).
    #[error("Record not found: {resource}/{id}")]
    NotFound {
        /// The collection.
        resource: String,
        /// The id as it appeared in the path.
        id: String,
    },

    /// Create collided with an existing id (HTTP 500).
    #[error("Duplicate key: {resource}/{id} already exists")]
    DuplicateKey {
        /// The collection.
        resource: String,
        /// The colliding id.
        id: String,
    },

    /// The request body is not a usable record (HTTP 400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Anything else, including an unreachable backend (HTTP 500).
    #[error("Internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::UnknownResource { .. } | RestError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::DuplicateKey { .. } | RestError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::UnknownResource { .. } => "unknown-resource",
            RestError::NotFound { .. } => "not-found",
            RestError::DuplicateKey { .. } => "duplicate-key",
            RestError::BadRequest { .. } => "invalid-record",
            RestError::InternalError { .. } => "backend-error",
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnknownResource { resource } => RestError::UnknownResource { resource },
            StorageError::NotFound { resource, id } => RestError::NotFound { resource, id },
            StorageError::DuplicateKey { resource, id } => RestError::DuplicateKey { resource, id },
            StorageError::InvalidRecord { resource, message } => RestError::BadRequest {
                message: format!("{}: {}", resource, message),
            },
            StorageError::Backend(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
