//! In-memory document store with token-overlap scoring.
//!
//! Documents are scored against a query by Jaccard similarity over their
//! lowercase alphanumeric tokens. Distance is `1 - similarity`, so an exact
//! token match scores 0 and disjoint text scores 1.

use async_trait::async_trait;
use edugenie_error::EduGenieResult;
use edugenie_interface::{Document, DocumentStore, ScoredDocument};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Document store held in process memory.
///
/// Cloning shares the underlying storage. All data is lost when the last
/// clone is dropped.
///
/// # Example
/// ```no_run
/// use edugenie::{Document, DocumentStore, InMemoryDocumentStore};
///
/// #[tokio::main]
/// async fn main() -> edugenie::EduGenieResult<()> {
///     let store = InMemoryDocumentStore::new();
///     store.add_documents(vec![Document::new("Mitochondria make ATP")]).await?;
///     let hits = store.similarity_search("ATP", 1).await?;
///     assert_eq!(hits.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Indexed>>>,
}

#[derive(Debug, Clone)]
struct Indexed {
    document: Document,
    tokens: HashSet<String>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// True when nothing has been added.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// All documents scored against `query`, nearest first. Ties keep
    /// insertion order.
    async fn ranked(&self, query: &str) -> Vec<ScoredDocument> {
        let query = tokenize(query);
        let documents = self.documents.read().await;
        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .map(|d| ScoredDocument::new(d.document.clone(), distance(&query, &d.tokens)))
            .collect();
        scored.sort_by(|a, b| a.distance().total_cmp(b.distance()));
        scored
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip_all, fields(count = docs.len()))]
    async fn add_documents(&self, docs: Vec<Document>) -> EduGenieResult<()> {
        let indexed = docs.into_iter().map(|document| Indexed {
            tokens: tokenize(document.content()),
            document,
        });
        let mut documents = self.documents.write().await;
        documents.extend(indexed);
        debug!(total = documents.len(), "Documents added");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn similarity_search(&self, query: &str, k: usize) -> EduGenieResult<Vec<Document>> {
        Ok(self
            .ranked(query)
            .await
            .into_iter()
            .take(k)
            .map(|hit| hit.document().clone())
            .collect())
    }

    #[instrument(skip(self))]
    async fn similarity_search_with_threshold(
        &self,
        query: &str,
        k: usize,
        max_distance: f32,
    ) -> EduGenieResult<Vec<ScoredDocument>> {
        Ok(self
            .ranked(query)
            .await
            .into_iter()
            .filter(|hit| *hit.distance() <= max_distance)
            .take(k)
            .collect())
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn distance(query: &HashSet<String>, document: &HashSet<String>) -> f32 {
    let union = query.union(document).count();
    if union == 0 {
        return 1.0;
    }
    let shared = query.intersection(document).count();
    1.0 - shared as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_ignore_case_and_punctuation() {
        let tokens = tokenize("ATP, atp! Krebs-cycle");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("krebs"));
    }

    #[test]
    fn distance_bounds() {
        let a = tokenize("cell membrane");
        assert_eq!(distance(&a, &a), 0.0);
        assert_eq!(distance(&a, &tokenize("river delta")), 1.0);
        assert_eq!(distance(&HashSet::new(), &HashSet::new()), 1.0);
        assert!((distance(&a, &tokenize("cell wall")) - (1.0 - 1.0 / 3.0)).abs() < 1e-6);
    }
}
