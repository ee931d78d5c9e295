//! Error types for mediacatalog.
//!
//! This module defines all error types used throughout the mediacatalog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for mediacatalog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Closing the database connection failed.
    #[error("failed to close database at {path}: {source}")]
    DatabaseClose {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    // === Catalog Errors ===
    /// A record with this path is already in the catalog.
    #[error("file already cataloged: {path}")]
    DuplicatePath {
        /// The conflicting path.
        path: String,
    },

    /// Binding a record field to the insert statement failed.
    #[error("failed to bind {field}: {source}")]
    Bind {
        /// Name of the statement parameter.
        field: &'static str,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A field value cannot be represented as an `SQLite` integer.
    #[error("{field} value {value} does not fit in a 64-bit signed integer")]
    ValueOutOfRange {
        /// Name of the record field.
        field: &'static str,
        /// The offending value.
        value: u64,
    },

    /// The catalog lock is held by another caller.
    #[error("catalog is busy")]
    Busy,

    /// The process-wide catalog has not been initialized.
    #[error("shared catalog is not initialized")]
    NotInitialized,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for mediacatalog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a bind error for the named parameter.
    #[must_use]
    pub fn bind(field: &'static str, source: rusqlite::Error) -> Self {
        Self::Bind { field, source }
    }

    /// Check if this error is a primary-key conflict on the record path.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicatePath { .. })
    }

    /// Check if this error means the catalog lock was contended.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}
