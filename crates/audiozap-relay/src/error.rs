//! Error types for the relay core.
//!
//! Policy rejections are not errors: they are expected, user-visible
//! verdicts carried by [`crate::policy::Verdict`]. `RelayError` covers
//! genuine faults only.

use thiserror::Error;

/// Errors that can occur in the relay core.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed event structure
    #[error("invalid event: {0}")]
    Event(String),

    /// Malformed query filter
    #[error("invalid filter: {0}")]
    Filter(String),

    /// Store-level fault. The in-memory store only produces this when its
    /// lock is poisoned; persistent backends add their own failure modes.
    #[error("store error: {0}")]
    Store(String),
}

/// Result type for relay core operations.
pub type Result<T> = std::result::Result<T, RelayError>;
