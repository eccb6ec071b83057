//! Contracts for the document store and file ingestion collaborators.

use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use edugenie_error::{EduGenieResult, FileResult};
use serde::{Deserialize, Serialize};

/// A unit of study material held by a [`DocumentStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct Document {
    /// Document text
    content: String,
    /// Free-form metadata (source file, page, ...)
    #[builder(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Creates a document with no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Returns the document with one metadata entry set.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Creates a builder for `Document`.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }
}

/// A search hit with its distance from the query (0 is identical).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ScoredDocument {
    /// Matching document
    document: Document,
    /// Distance from the query
    distance: f32,
}

impl ScoredDocument {
    /// Pairs a document with its distance.
    pub fn new(document: Document, distance: f32) -> Self {
        Self { document, distance }
    }
}

/// Similarity search over study material.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Adds documents to the store.
    async fn add_documents(&self, docs: Vec<Document>) -> EduGenieResult<()>;

    /// Returns up to `k` documents nearest to `query`, nearest first.
    async fn similarity_search(&self, query: &str, k: usize) -> EduGenieResult<Vec<Document>>;

    /// Like [`similarity_search`](Self::similarity_search), keeping only hits
    /// whose distance does not exceed `max_distance`.
    async fn similarity_search_with_threshold(
        &self,
        query: &str,
        k: usize,
        max_distance: f32,
    ) -> EduGenieResult<Vec<ScoredDocument>>;
}

/// Text extracted from an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ProcessedFile {
    /// Extracted text
    content: String,
    /// Detected kind, e.g. `markdown`
    kind: String,
    /// Original file name
    name: String,
}

impl ProcessedFile {
    /// Creates a processed file record.
    pub fn new(content: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Turns uploaded files into study text.
pub trait FileProcessor: Send + Sync {
    /// Extracts text from `bytes`, using `name` and `mime` to pick a format.
    fn process_file(&self, name: &str, mime: &str, bytes: &[u8]) -> FileResult<ProcessedFile>;
}
