//! File ingestion error types.

/// Error conditions raised while turning an uploaded file into study text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FileErrorKind {
    /// The file type has no text extractor.
    #[display("Unsupported file type for {}: {}", name, mime)]
    UnsupportedFormat {
        /// File name as uploaded
        name: String,
        /// Declared MIME type
        mime: String,
    },
    /// The file contained no text.
    #[display("File {} is empty", _0)]
    Empty(String),
    /// The file could not be read.
    #[display("Failed to read {}: {}", name, message)]
    Read {
        /// File name or path
        name: String,
        /// Underlying I/O message
        message: String,
    },
}

/// File ingestion error with source location.
///
/// # Examples
///
/// ```
/// use edugenie_error::{FileError, FileErrorKind};
///
/// let err = FileError::new(FileErrorKind::Empty("notes.txt".into()));
/// assert!(format!("{}", err).contains("notes.txt"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("File Error: {} at line {} in {}", kind, line, file)]
pub struct FileError {
    /// The kind of error that occurred
    pub kind: FileErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl FileError {
    /// Create a new FileError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FileErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for file ingestion.
pub type FileResult<T> = Result<T, FileError>;
