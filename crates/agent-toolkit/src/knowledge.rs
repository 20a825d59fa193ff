//! Knowledge Store
//!
//! Abstraction over local document retrieval. Real deployments back this
//! with a vector store; the in-memory implementation here ranks by
//! case-insensitive term overlap, which keeps the tool contract testable
//! without an embedding model.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolkitError};

/// One retrieved passage
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnowledgeHit {
    /// Where the passage came from (file name, document id)
    pub source: String,

    pub content: String,

    /// Relevance score, higher is better
    pub score: f32,
}

/// Retrieval trait for knowledge-base lookup
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Return up to `k` passages relevant to the query, best first
    async fn search(&self, query: &str, k: usize) -> Result<Vec<KnowledgeHit>>;
}

#[derive(Clone, Debug)]
struct Document {
    source: String,
    content: String,
}

/// In-memory keyword-scored store
pub struct MemoryKnowledgeStore {
    documents: RwLock<Vec<Document>>,
}

impl Default for MemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKnowledgeStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Add one document
    pub fn add_document(&self, source: impl Into<String>, content: impl Into<String>) {
        let mut documents = self.documents.write().unwrap();
        documents.push(Document {
            source: source.into(),
            content: content.into(),
        });
    }

    /// Load every `.txt` / `.md` file in a directory as one document each
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let mut loaded = 0;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_text = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e, "txt" | "md"));
            if !is_text {
                continue;
            }

            let source = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ToolkitError::Knowledge(format!("failed to read {source}: {e}"))
            })?;
            self.add_document(source, content);
            loaded += 1;
        }

        tracing::info!(loaded, "knowledge documents loaded");
        Ok(loaded)
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }

    fn score(query_terms: &[String], content: &str) -> f32 {
        let haystack = content.to_lowercase();
        query_terms
            .iter()
            .filter(|term| haystack.contains(term.as_str()))
            .count() as f32
    }
}

#[async_trait]
impl KnowledgeStore for MemoryKnowledgeStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<KnowledgeHit>> {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let documents = self.documents.read().unwrap();
        let mut hits: Vec<KnowledgeHit> = documents
            .iter()
            .filter_map(|doc| {
                let score = Self::score(&terms, &doc.content);
                (score > 0.0).then(|| KnowledgeHit {
                    source: doc.source.clone(),
                    content: doc.content.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_term_overlap_ranking() {
        let store = MemoryKnowledgeStore::new();
        store.add_document("a.md", "The warranty covers two years of repairs.");
        store.add_document("b.md", "Shipping takes three to five days.");
        store.add_document("c.md", "Warranty repairs are free in the warranty period.");

        let hits = store.search("warranty repairs", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "a.md");
        assert!(hits.iter().all(|h| h.source != "b.md"));
    }

    #[tokio::test]
    async fn test_no_match_returns_empty() {
        let store = MemoryKnowledgeStore::new();
        store.add_document("a.md", "completely unrelated text");

        let hits = store.search("quantum refrigerator", 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_load_dir_reports_unreadable_file() {
        let dir = std::env::temp_dir().join(format!("kb-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bad.md"), [0xff, 0xfe, 0x80]).unwrap();

        let store = MemoryKnowledgeStore::new();
        let err = store.load_dir(&dir).unwrap_err();
        assert!(matches!(err, ToolkitError::Knowledge(_)));
        assert!(err.to_string().contains("bad.md"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_case_insensitive() {
        let store = MemoryKnowledgeStore::new();
        store.add_document("a.md", "Returns are accepted within 30 days.");

        let hits = store.search("RETURNS", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
    }
}
