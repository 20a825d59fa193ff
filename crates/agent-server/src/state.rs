//! Application State

use std::sync::Arc;

use agent_core::{ModelGateway, ToolRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Model gateway (Ollama, etc.)
    pub gateway: Arc<dyn ModelGateway>,

    /// Tool registry with all available tools
    pub tools: Arc<ToolRegistry>,
}
