//! Store error types.

use std::time::Duration;

/// Errors from a station or route store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The call did not finish before its deadline. Safe to retry.
    #[error("store operation {operation} timed out after {}ms", after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A uniqueness rule would be broken
    #[error("{0}")]
    Conflict(String),

    /// Reading or writing the backing file failed
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded
    #[error("store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the failure is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}
