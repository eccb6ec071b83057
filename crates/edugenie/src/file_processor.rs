//! Plain-text file ingestion.

use edugenie_error::{FileError, FileErrorKind, FileResult};
use edugenie_interface::{FileProcessor, ProcessedFile};
use tracing::{debug, instrument};

/// Accepts text, markdown, CSV and JSON uploads.
///
/// The format is taken from the MIME type when it is recognised, otherwise
/// from the file extension. Bytes are decoded as UTF-8, replacing invalid
/// sequences.
///
/// # Examples
///
/// ```
/// use edugenie::{FileProcessor, PlainTextFileProcessor};
///
/// let file = PlainTextFileProcessor
///     .process_file("notes.md", "", b"# Cells\nThe basic unit of life.")
///     .unwrap();
/// assert_eq!(file.kind(), "markdown");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFileProcessor;

impl PlainTextFileProcessor {
    fn kind_of(name: &str, mime: &str) -> Option<&'static str> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let by_mime = match essence.to_ascii_lowercase().as_str() {
            "text/plain" => Some("text"),
            "text/markdown" | "text/x-markdown" => Some("markdown"),
            "text/csv" => Some("csv"),
            "application/json" => Some("json"),
            _ => None,
        };
        by_mime.or_else(|| {
            let (_, extension) = name.rsplit_once('.')?;
            match extension.to_ascii_lowercase().as_str() {
                "txt" | "text" => Some("text"),
                "md" | "markdown" => Some("markdown"),
                "csv" => Some("csv"),
                "json" => Some("json"),
                _ => None,
            }
        })
    }
}

impl FileProcessor for PlainTextFileProcessor {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn process_file(&self, name: &str, mime: &str, bytes: &[u8]) -> FileResult<ProcessedFile> {
        let kind = Self::kind_of(name, mime).ok_or_else(|| {
            FileError::new(FileErrorKind::UnsupportedFormat {
                name: name.to_string(),
                mime: if mime.is_empty() {
                    "unknown".to_string()
                } else {
                    mime.to_string()
                },
            })
        })?;

        let content = String::from_utf8_lossy(bytes);
        if content.trim().is_empty() {
            return Err(FileError::new(FileErrorKind::Empty(name.to_string())));
        }

        debug!(kind, "File processed");
        Ok(ProcessedFile::new(content, kind, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_wins_over_extension() {
        assert_eq!(
            PlainTextFileProcessor::kind_of("data.txt", "application/json; charset=utf-8"),
            Some("json")
        );
        assert_eq!(PlainTextFileProcessor::kind_of("notes.MD", ""), Some("markdown"));
        assert_eq!(PlainTextFileProcessor::kind_of("slides.pdf", "application/pdf"), None);
        assert_eq!(PlainTextFileProcessor::kind_of("README", ""), None);
    }
}
