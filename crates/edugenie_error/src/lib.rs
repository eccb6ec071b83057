//! Error types for the EduGenie study tools.
//!
//! Every layer owns a `*ErrorKind` describing what went wrong and a
//! `*Error` wrapper that records where the error was created.

mod backend;
mod config;
mod error;
mod file;
mod parse;
mod retry;

pub use backend::{BackendError, BackendErrorKind, BackendResult, truncate_excerpt};
pub use config::{ConfigError, ConfigErrorKind, ConfigResult};
pub use error::{EduGenieError, EduGenieErrorKind, EduGenieResult};
pub use file::{FileError, FileErrorKind, FileResult};
pub use parse::{ParseError, ParseErrorKind, ParseResult};
pub use retry::RetryableError;
