//! Error types for the persistence layer.
//!
//! Every store operation fails with a [`StorageError`]. The variants mirror the
//! outcomes the REST layer has to distinguish: unknown collection, missing
//! record, duplicate key, rejected payload, and backend trouble.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The requested collection is not configured in the registry.
    #[error("unknown resource: {resource}")]
    UnknownResource { resource: String },

    /// No record with the given id exists (also used for malformed ids).
    #[error("record not found: {resource}/{id}")]
    NotFound { resource: String, id: String },

    /// A record with the given id already exists.
    #[error("duplicate key: {resource}/{id} already exists")]
    DuplicateKey { resource: String, id: String },

    /// The payload cannot be stored (e.g. a non-integer `id`).
    #[error("invalid record for {resource}: {message}")]
    InvalidRecord { resource: String, message: String },

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Builds a [`StorageError::NotFound`] for the given collection and raw id.
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        StorageError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Builds a [`StorageError::DuplicateKey`] for the given collection and id.
    pub fn duplicate_key(resource: impl Into<String>, id: impl ToString) -> Self {
        StorageError::DuplicateKey {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Builds the error for a collection whose high-water mark is `i64::MAX`.
    pub fn ids_exhausted(backend_name: &str, resource: &str) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: backend_name.to_string(),
            message: format!("no ids left to allocate in {}", resource),
            source: None,
        })
    }

    /// Returns `true` if the backend could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StorageError::Backend(
                BackendError::Unavailable { .. } | BackendError::ConnectionFailed { .. }
            )
        )
    }
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Errors raised while reading a snapshot or loading it into the stores.
#[derive(Error, Debug)]
pub enum SeedError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// The snapshot is JSON but not shaped as `{ resource: [record, ...] }`.
    #[error("invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    /// Loading into a store failed; fatal for the whole load.
    #[error("failed to load {resource}: {source}")]
    Storage {
        resource: String,
        #[source]
        source: StorageError,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for seeding operations.
pub type SeedResult<T> = Result<T, SeedError>;

// Implement conversions from common error types

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::ConnectionFailed {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::ServerSelection { message, .. } => {
                StorageError::Backend(BackendError::Unavailable {
                    backend_name: "mongodb".to_string(),
                    message: message.clone(),
                })
            }
            ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
                StorageError::Backend(BackendError::Unavailable {
                    backend_name: "mongodb".to_string(),
                    message: err.to_string(),
                })
            }
            ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
                StorageError::Backend(BackendError::SerializationError {
                    message: err.to_string(),
                })
            }
            _ => StorageError::Backend(BackendError::Internal {
                backend_name: "mongodb".to_string(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::not_found("albums", 999);
        assert_eq!(err.to_string(), "record not found: albums/999");

        let err = StorageError::duplicate_key("albums", 1);
        assert_eq!(err.to_string(), "duplicate key: albums/1 already exists");

        let err = StorageError::UnknownResource {
            resource: "widgets".to_string(),
        };
        assert_eq!(err.to_string(), "unknown resource: widgets");
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Unavailable {
            backend_name: "mongodb".to_string(),
            message: "no servers".to_string(),
        };
        assert!(err.to_string().contains("backend unavailable"));
    }

    #[test]
    fn test_is_unavailable() {
        let err: StorageError = BackendError::ConnectionFailed {
            backend_name: "sqlite".to_string(),
            message: "pool timed out".to_string(),
        }
        .into();
        assert!(err.is_unavailable());
        assert!(!StorageError::not_found("users", 1).is_unavailable());
    }

    #[test]
    fn test_seed_error_wraps_storage_error() {
        let err = SeedError::Storage {
            resource: "albums".to_string(),
            source: StorageError::duplicate_key("albums", 3),
        };
        assert!(err.to_string().starts_with("failed to load albums"));
    }
}
