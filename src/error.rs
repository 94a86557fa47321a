//! Error types for the Biblioteca client

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error means the backend could not be reached at all
    /// (as opposed to the backend answering with an error). Only transport
    /// failures may trigger offline fallbacks.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // Status errors are mapped explicitly by the HTTP engine before the
        // body is consumed; anything surfacing here is connect/timeout/body
        // level and counts as an outage.
        AppError::Transport(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
