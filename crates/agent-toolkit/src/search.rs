//! Web Search Backends
//!
//! Abstraction and implementations for internet search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolkitError};

/// One search result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

/// Search client trait (Strategy pattern)
///
/// Implement this for each backend: DuckDuckGo, SearxNG, Brave, etc.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a query and return up to `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Backend name
    fn name(&self) -> &str;
}

/// DuckDuckGo instant-answer client. Free, no API key; returns abstract
/// text and related topics rather than full web results, which is enough
/// context for the model to ground an answer.
pub struct DuckDuckGoClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: "https://api.duckduckgo.com/".into(),
        }
    }

    /// Point at a different endpoint (tests, self-hosted mirrors)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn parse_payload(payload: &serde_json::Value, max_results: usize) -> Vec<SearchHit> {
        let mut hits = Vec::new();

        let heading = payload["Heading"].as_str().unwrap_or("");
        let abstract_text = payload["AbstractText"].as_str().unwrap_or("");
        if !abstract_text.is_empty() {
            hits.push(SearchHit {
                title: heading.to_string(),
                snippet: abstract_text.to_string(),
            });
        }

        if let Some(topics) = payload["RelatedTopics"].as_array() {
            for topic in topics {
                if hits.len() >= max_results {
                    break;
                }
                if let Some(text) = topic["Text"].as_str() {
                    if text.is_empty() {
                        continue;
                    }
                    hits.push(SearchHit {
                        title: topic["FirstURL"].as_str().unwrap_or("").to_string(),
                        snippet: text.to_string(),
                    });
                }
            }
        }

        hits.truncate(max_results);
        hits
    }
}

#[async_trait]
impl SearchClient for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(ToolkitError::Search("empty query".into()));
        }

        let payload: serde_json::Value = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Self::parse_payload(&payload, max_results))
    }

    fn name(&self) -> &str {
        "DuckDuckGo"
    }
}
