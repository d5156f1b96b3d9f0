//! Error types for the cache worker
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Worker Error Enum ==
/// Unified error type for the cache worker and its HTTP surface.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Network fetch could not be completed
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Network fetch completed with a non-success status
    #[error("Fetch for {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Cache storage could not be read or persisted
    #[error("Storage error: {0}")]
    Storage(String),

    /// Lifecycle operation called from the wrong state
    #[error("Invalid lifecycle state: {0}")]
    InvalidState(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body over the proxy's buffering limit
    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorkerError {
    /// Builds a fetch error for `url` from any displayable cause.
    pub fn fetch(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        WorkerError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for WorkerError {
    fn from(err: std::io::Error) -> Self {
        WorkerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for WorkerError {
    fn from(err: serde_json::Error) -> Self {
        WorkerError::Storage(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let status = match &self {
            WorkerError::Fetch { .. } | WorkerError::Status { .. } => StatusCode::BAD_GATEWAY,
            WorkerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WorkerError::InvalidState(_) => StatusCode::CONFLICT,
            WorkerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            WorkerError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            WorkerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache worker.
pub type Result<T> = std::result::Result<T, WorkerError>;
