//! Error types for backend API calls.

use thiserror::Error;

/// Message shown when the backend cannot be reached at all.
pub const CONNECTIVITY_MESSAGE: &str = "Connection error. Make sure backend is running.";

/// Errors that can occur while talking to the monitoring backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network unreachable, connection refused, DNS failure.
    #[error("Connection error. Make sure backend is running. ({0})")]
    Connectivity(String),

    /// Request exceeded the configured deadline.
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// Backend answered with `success: false`.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Body was not JSON or did not match the expected payload.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True for failures where the backend never produced an answer.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connectivity(_) | ApiError::Timeout(_))
    }

    /// Short text for inline display on a dashboard surface.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Connectivity(_) | ApiError::Timeout(_) => CONNECTIVITY_MESSAGE.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::InvalidResponse(_) => self.to_string(),
        }
    }
}
