//! Reading study material from disk or standard input.

use edugenie::{
    Document, DocumentStore, EduGenieResult, FileProcessor, InMemoryDocumentStore,
    PlainTextFileProcessor, ProcessedFile,
};
use edugenie_error::{FileError, FileErrorKind};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Passages pulled from a notes file for one study set.
const RELEVANT_PASSAGES: usize = 4;

/// Reads a text file, or standard input for `-`.
pub async fn read_study_file(path: &Path) -> EduGenieResult<ProcessedFile> {
    let name = path.display().to_string();
    let read_error = |e: std::io::Error| {
        FileError::new(FileErrorKind::Read {
            name: name.clone(),
            message: e.to_string(),
        })
    };

    if path == Path::new("-") {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .map_err(read_error)?;
        return Ok(PlainTextFileProcessor.process_file("stdin", "text/plain", &bytes)?);
    }

    let bytes = tokio::fs::read(path).await.map_err(read_error)?;
    Ok(PlainTextFileProcessor.process_file(&name, "", &bytes)?)
}

/// Reads an image and returns it with its MIME type.
pub async fn read_image(path: &Path) -> EduGenieResult<(Vec<u8>, &'static str)> {
    let name = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mime = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => {
            return Err(FileError::new(FileErrorKind::UnsupportedFormat {
                name,
                mime: "unknown".to_string(),
            })
            .into());
        }
    };

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        FileError::new(FileErrorKind::Read {
            name: name.clone(),
            message: e.to_string(),
        })
    })?;
    if bytes.is_empty() {
        return Err(FileError::new(FileErrorKind::Empty(name)).into());
    }
    Ok((bytes, mime))
}

/// Source material for a study set: inline content followed by the notes
/// passages closest to `topic`.
pub async fn gather_content(
    topic: &str,
    content: Option<&str>,
    notes: Option<&Path>,
) -> EduGenieResult<String> {
    let mut sections: Vec<String> = content.map(str::to_string).into_iter().collect();

    if let Some(path) = notes {
        let file = read_study_file(path).await?;
        let store = InMemoryDocumentStore::new();
        let passages = file
            .content()
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| Document::new(p).with_metadata("source", file.name().as_str()))
            .collect();
        store.add_documents(passages).await?;
        let hits = store.similarity_search(topic, RELEVANT_PASSAGES).await?;
        sections.extend(hits.into_iter().map(|d| d.content().clone()));
    }

    Ok(sections.join("\n\n"))
}
