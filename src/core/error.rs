/// hoteldb Error Module
///
/// This module defines the error type shared by the whole crate. The access
/// layer originates exactly one error of its own (`NotConnected`); everything
/// the SQLite driver reports is carried through untouched.
use thiserror::Error;

/// Error type for hoteldb.
///
/// - `NotConnected` is a usage error: an operation ran before `connect`.
/// - `Database` wraps the driver error verbatim.
/// - The remaining variants belong to typed decoding, configuration and I/O.
#[derive(Error, Debug)]
pub enum HotelDbError {
    /// An operation needing a live connection was called while disconnected
    #[error("Database connection is not established (path: {path})")]
    NotConnected { path: String },

    /// Errors raised by SQLite, passed through unchanged
    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    /// A column was missing or held a value of the wrong type
    #[error("Column error: {column}: {reason}")]
    Column { column: String, reason: String },

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HotelDbError {
    /// Returns the SQLite error code when this is a driver failure.
    pub fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        match self {
            HotelDbError::Database(e) => e.sqlite_error_code(),
            _ => None,
        }
    }

    /// True for the usage error raised before `connect`.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, HotelDbError::NotConnected { .. })
    }
}

/// Type alias for Result to use HotelDbError as the error type.
pub type Result<T> = std::result::Result<T, HotelDbError>;
