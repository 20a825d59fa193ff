//! # agent-runtime
//!
//! Model-gateway implementations for the react-agent system.
//!
//! ## Gateways
//!
//! - **Ollama** (default): local inference via the Ollama generate API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OllamaGateway;
//!
//! let gateway = OllamaGateway::from_env();
//! let agent = AgentBuilder::new()
//!     .gateway(Arc::new(gateway))
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaGateway};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, ModelGateway, ReactAgent, Result, Run, Tool, ToolRegistry,
};
