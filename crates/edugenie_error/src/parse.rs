//! Response repair error types.

/// Why raw model output could not be turned into records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParseErrorKind {
    /// No JSON could be recovered from the text.
    #[display("AI returned invalid format: {}", _0)]
    UnparsableResponse(String),
    /// JSON was recovered but is neither an array nor a known array wrapper.
    #[display("AI response has an unexpected shape: {}", _0)]
    UnexpectedResponseShape(String),
    /// Every recovered entry was unusable.
    #[display("No valid {} found in response", _0)]
    EmptyResultSet(String),
}

/// Parse error with location tracking.
///
/// # Examples
///
/// ```
/// use edugenie_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::EmptyResultSet("flashcards".into()));
/// assert!(format!("{}", err).contains("No valid flashcards"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ParseError {
    /// Create a new parse error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for response repair.
pub type ParseResult<T> = Result<T, ParseError>;
