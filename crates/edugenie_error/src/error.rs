//! Crate-level error aggregation.

use crate::{BackendError, ConfigError, FileError, ParseError};

/// Crate-level error variants.
#[derive(Debug, Clone, derive_more::From, derive_more::Display)]
pub enum EduGenieErrorKind {
    /// Transport or adapter failure
    #[display("{}", _0)]
    Backend(BackendError),
    /// Model output could not be repaired into records
    #[display("{}", _0)]
    Parse(ParseError),
    /// Invalid or unreadable configuration
    #[display("{}", _0)]
    Config(ConfigError),
    /// Uploaded file could not be turned into text
    #[display("{}", _0)]
    File(FileError),
}

/// EduGenie error with kind discrimination.
///
/// # Examples
///
/// ```
/// use edugenie_error::{BackendError, BackendErrorKind, EduGenieError, EduGenieErrorKind};
///
/// let err: EduGenieError = BackendError::new(BackendErrorKind::MissingApiKey).into();
/// assert!(matches!(err.kind(), EduGenieErrorKind::Backend(_)));
/// ```
#[derive(Debug, Clone)]
pub struct EduGenieError(Box<EduGenieErrorKind>);

impl EduGenieError {
    /// Create a new error from a kind.
    pub fn new(kind: EduGenieErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EduGenieErrorKind {
        &self.0
    }

    /// Plain-language description suitable for showing to a student.
    ///
    /// Drops the source location that the [`std::fmt::Display`] impl carries.
    pub fn user_message(&self) -> String {
        match self.kind() {
            EduGenieErrorKind::Backend(e) => e.kind.to_string(),
            EduGenieErrorKind::Parse(e) => e.kind.to_string(),
            EduGenieErrorKind::Config(e) => e.kind.to_string(),
            EduGenieErrorKind::File(e) => e.kind.to_string(),
        }
    }
}

impl std::fmt::Display for EduGenieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EduGenie Error: {}", self.0)
    }
}

impl std::error::Error for EduGenieError {}

// Generic From implementation for any type that converts to EduGenieErrorKind
impl<T> From<T> for EduGenieError
where
    T: Into<EduGenieErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for EduGenie operations.
pub type EduGenieResult<T> = std::result::Result<T, EduGenieError>;
