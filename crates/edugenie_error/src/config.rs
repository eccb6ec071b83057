//! Configuration error types.

/// Configuration error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Configuration sources could not be read or merged.
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// A configuration value is present but invalid.
    #[display("Invalid value for '{}': {}", key, message)]
    InvalidValue {
        /// Configuration key
        key: String,
        /// What is wrong with it
        message: String,
    },
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use edugenie_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Load("missing file".into()));
/// assert!(format!("{}", err).contains("missing file"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
