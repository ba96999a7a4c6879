//! Error types for authentication and session persistence.

use thiserror::Error;

/// Failure to read or write the durable session.
#[derive(Error, Debug)]
pub enum SessionStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors returned by [`super::SessionStore::login`].
#[derive(Error, Debug)]
pub enum AuthError {
    /// Backend refused the credentials; carries the server's message.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Backend could not be reached.
    #[error("Connection error. Make sure backend is running.")]
    Connectivity(String),

    /// Login succeeded but the session could not be persisted.
    #[error("Failed to persist session: {0}")]
    Storage(#[from] SessionStorageError),
}
