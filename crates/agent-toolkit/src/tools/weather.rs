//! Weather Tool
//!
//! There is no dedicated weather API behind this; it reuses the
//! [`SearchClient`] backend with a weather-focused query and trims the
//! results down, which is enough for the model to read off current
//! conditions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use agent_core::{Result, Tool, ToolResult};

use crate::search::SearchClient;

const MAX_RESULTS: usize = 3;
const REPORTED_HITS: usize = 2;
const SNIPPET_CHARS: usize = 100;

pub struct WeatherTool {
    client: Arc<dyn SearchClient>,
    default_city: String,
}

impl WeatherTool {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            default_city: "Beijing".into(),
        }
    }

    /// City used when the model calls the tool without an argument
    pub fn with_default_city(client: Arc<dyn SearchClient>, city: impl Into<String>) -> Self {
        Self {
            client,
            default_city: city.into(),
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get current weather for a city. Input: the city name, e.g. 'Berlin'."
    }

    async fn invoke(&self, input: &str) -> Result<ToolResult> {
        let city = match input.trim() {
            "" => self.default_city.as_str(),
            city => city,
        };
        let query = format!("{city} weather today");

        debug!(city, "looking up weather");

        match self.client.search(&query, MAX_RESULTS).await {
            Ok(hits) if hits.is_empty() => Ok(ToolResult::success(format!(
                "no weather information found for {city}"
            ))),
            Ok(hits) => {
                let report = hits
                    .iter()
                    .take(REPORTED_HITS)
                    .map(|hit| {
                        let snippet: String = hit.snippet.chars().take(SNIPPET_CHARS).collect();
                        if hit.title.is_empty() {
                            snippet
                        } else {
                            format!("{}: {}", hit.title, snippet)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(ToolResult::success(report))
            }
            Err(e) => {
                warn!(error = %e, "weather lookup failed");
                Ok(ToolResult::failure(format!("weather lookup failed: {e}")))
            }
        }
    }
}
