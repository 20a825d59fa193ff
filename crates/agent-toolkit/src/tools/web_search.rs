//! Web Search Tool
//!
//! Wraps a [`SearchClient`] behind the agent's tool contract. Backend
//! failures surface as `ToolResult::failure` observations so the model
//! can recover or rephrase instead of aborting the run.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use agent_core::{Result, Tool, ToolResult};

use crate::search::SearchClient;

const DEFAULT_MAX_RESULTS: usize = 3;

pub struct WebSearchTool {
    client: Arc<dyn SearchClient>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(client: Arc<dyn SearchClient>, max_results: usize) -> Self {
        Self {
            client,
            max_results,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the internet for current information. Input: a search query string."
    }

    async fn invoke(&self, input: &str) -> Result<ToolResult> {
        let query = input.trim();
        if query.is_empty() {
            return Ok(ToolResult::failure("a search query is required"));
        }

        debug!(query, backend = self.client.name(), "running web search");

        match self.client.search(query, self.max_results).await {
            Ok(hits) if hits.is_empty() => Ok(ToolResult::success(format!(
                "no results found for '{query}'"
            ))),
            Ok(hits) => {
                let listing = hits
                    .iter()
                    .map(|hit| {
                        if hit.title.is_empty() {
                            format!("- {}", hit.snippet)
                        } else {
                            format!("- {}\n  {}", hit.title, hit.snippet)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(ToolResult::success(listing))
            }
            Err(e) => {
                warn!(error = %e, "web search failed");
                Ok(ToolResult::failure(format!("search failed: {e}")))
            }
        }
    }
}
