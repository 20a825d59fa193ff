//! Ollama Model Gateway
//!
//! Implementation of `ModelGateway` for local Ollama inference, using
//! the single-prompt generate endpoint.

use agent_core::{
    error::{AgentError, Result},
    gateway::ModelGateway,
};
use async_trait::async_trait;
use ollama_rs::{
    generation::completion::request::GenerationRequest,
    models::ModelOptions as OllamaOptions,
    Ollama,
};

/// Ollama gateway configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Model to generate with
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per completion
    pub max_tokens: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            model: "qwen2.5:7b".into(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("OLLAMA_HOST").unwrap_or(defaults.host);
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let model = std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model);

        Self {
            host,
            port,
            model,
            ..defaults
        }
    }
}

/// Ollama model gateway
pub struct OllamaGateway {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaGateway {
    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Self {
        Self {
            client: Ollama::new(&config.host, config.port),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::from_config(OllamaConfig::default())
    }

    /// The configured model identifier
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl ModelGateway for OllamaGateway {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let options = OllamaOptions::default()
            .temperature(self.config.temperature)
            .num_predict(self.config.max_tokens as i32);

        let request =
            GenerationRequest::new(self.config.model.clone(), prompt.to_string())
                .options(options);

        let response = self
            .client
            .generate(request)
            .await
            .map_err(|e| AgentError::Gateway(e.to_string()))?;

        Ok(response.response)
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost");
        assert_eq!(config.port, 11434);
        assert_eq!(config.model, "qwen2.5:7b");
    }

    #[test]
    fn test_gateway_name() {
        let gateway = OllamaGateway::localhost();
        assert_eq!(gateway.name(), "Ollama");
        assert_eq!(gateway.model(), "qwen2.5:7b");
    }
}
