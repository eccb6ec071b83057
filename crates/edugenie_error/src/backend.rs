//! Backend (transport and adapter) error types.

/// Maximum number of characters of an error body kept in an excerpt.
pub const EXCERPT_LIMIT: usize = 200;

/// Specific error conditions raised while talking to an inference backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BackendErrorKind {
    /// The network call itself failed (connection refused, DNS, reset).
    #[display("Backend at {} isn't responding: {}", url, message)]
    Unreachable {
        /// Endpoint that could not be reached
        url: String,
        /// Underlying transport message
        message: String,
    },
    /// The backend answered with a non-success status.
    #[display("Backend returned HTTP {}: {}", status, excerpt)]
    Http {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        excerpt: String,
    },
    /// The backend reported a failure inside a success response.
    #[display("Backend reported an error: {}", _0)]
    Generation(String),
    /// A success response carried no generated text.
    #[display("Backend returned an empty response")]
    EmptyResponse,
    /// The requested model is not installed on the backend.
    #[display("Model \"{}\" not found. {}", model, hint)]
    ModelNotFound {
        /// Model identifier that was requested
        model: String,
        /// Remediation hint for the user
        hint: String,
    },
    /// The hosted backend requires an API key that was not configured.
    #[display("API key not configured for the hosted backend")]
    MissingApiKey,
    /// The backend has no implementation for the requested capability.
    #[display("Capability not supported by this backend: {}", _0)]
    Unsupported(String),
    /// The caller cancelled an in-flight stream.
    #[display("Generation cancelled")]
    Cancelled,
    /// The request could not be built or its body could not be read.
    #[display("Request failed: {}", _0)]
    Request(String),
}

/// Backend error with location tracking.
///
/// # Examples
///
/// ```
/// use edugenie_error::{BackendError, BackendErrorKind};
///
/// let err = BackendError::new(BackendErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("empty response"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", kind, line, file)]
pub struct BackendError {
    /// The kind of error that occurred
    pub kind: BackendErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BackendError {
    /// Create a new backend error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BackendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`BackendErrorKind::Http`] error with a truncated body.
    #[track_caller]
    pub fn http(status: u16, body: &str) -> Self {
        Self::new(BackendErrorKind::Http {
            status,
            excerpt: truncate_excerpt(body),
        })
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            BackendErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Truncates a response body to at most [`EXCERPT_LIMIT`] characters.
///
/// ```
/// use edugenie_error::truncate_excerpt;
///
/// let body = "x".repeat(500);
/// assert_eq!(truncate_excerpt(&body).chars().count(), 200);
/// assert_eq!(truncate_excerpt("short"), "short");
/// ```
pub fn truncate_excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_LIMIT).collect()
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
