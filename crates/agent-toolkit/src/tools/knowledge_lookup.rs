//! Knowledge Lookup Tool
//!
//! Retrieval over the local knowledge base, exposed to the model as
//! `search_knowledge`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use agent_core::{Result, Tool, ToolResult};

use crate::knowledge::KnowledgeStore;

const DEFAULT_TOP_K: usize = 3;

pub struct KnowledgeLookupTool {
    store: Arc<dyn KnowledgeStore>,
    top_k: usize,
}

impl KnowledgeLookupTool {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(store: Arc<dyn KnowledgeStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }
}

#[async_trait]
impl Tool for KnowledgeLookupTool {
    fn name(&self) -> &str {
        "search_knowledge"
    }

    fn description(&self) -> &str {
        "Search the local knowledge base for relevant documents. Input: a search query string."
    }

    async fn invoke(&self, input: &str) -> Result<ToolResult> {
        let query = input.trim();
        if query.is_empty() {
            return Ok(ToolResult::failure("a search query is required"));
        }

        debug!(query, "searching knowledge base");

        match self.store.search(query, self.top_k).await {
            Ok(hits) if hits.is_empty() => Ok(ToolResult::success(format!(
                "no knowledge base entries matched '{query}'"
            ))),
            Ok(hits) => {
                let listing = hits
                    .iter()
                    .map(|hit| format!("[{}] {}", hit.source, hit.content.trim()))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(ToolResult::success(listing))
            }
            Err(e) => {
                warn!(error = %e, "knowledge lookup failed");
                Ok(ToolResult::failure(format!("knowledge lookup failed: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::MemoryKnowledgeStore;

    #[tokio::test]
    async fn test_lists_hits_with_sources() {
        let store = MemoryKnowledgeStore::new();
        store.add_document("faq.md", "Refunds are issued within 14 days.");
        let tool = KnowledgeLookupTool::new(Arc::new(store));

        let result = tool.invoke("refunds").await.unwrap();
        assert!(result.success);
        let data = result.data.unwrap();
        assert!(data.contains("[faq.md]"));
        assert!(data.contains("14 days"));
    }

    #[tokio::test]
    async fn test_no_match_is_successful_observation() {
        let store = MemoryKnowledgeStore::new();
        store.add_document("faq.md", "Refunds are issued within 14 days.");
        let tool = KnowledgeLookupTool::new(Arc::new(store));

        let result = tool.invoke("spaceship engines").await.unwrap();
        assert!(result.success);
        assert!(result.data.unwrap().contains("no knowledge base entries"));
    }

    #[tokio::test]
    async fn test_empty_query_is_failure_observation() {
        let store = MemoryKnowledgeStore::new();
        let tool = KnowledgeLookupTool::new(Arc::new(store));

        let result = tool.invoke("").await.unwrap();
        assert!(!result.success);
    }
}
