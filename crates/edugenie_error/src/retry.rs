//! Retry classification for backend errors.

use crate::{BackendError, BackendErrorKind};

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use edugenie_error::{BackendError, BackendErrorKind, RetryableError};
///
/// let err = BackendError::new(BackendErrorKind::Unreachable {
///     url: "http://localhost:11434".into(),
///     message: "connection refused".into(),
/// });
/// assert!(err.is_retryable());
///
/// let err = BackendError::http(500, "boom");
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for BackendErrorKind {
    fn is_retryable(&self) -> bool {
        // Status errors mean the backend is up and answered; retrying will not help.
        matches!(self, BackendErrorKind::Unreachable { .. })
    }
}

impl RetryableError for BackendError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
