//! # agent-toolkit
//!
//! Search and knowledge-lookup tools for the react-agent system.
//!
//! ## Components
//!
//! - [`SearchClient`] / [`DuckDuckGoClient`]: internet search backends
//! - [`KnowledgeStore`] / [`MemoryKnowledgeStore`]: local document retrieval
//! - [`WebSearchTool`] / [`WeatherTool`] / [`KnowledgeLookupTool`]: the
//!   agent-facing tools
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agent_toolkit::{DuckDuckGoClient, WebSearchTool};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(WebSearchTool::new(Arc::new(DuckDuckGoClient::new())));
//! ```

pub mod error;
pub mod knowledge;
pub mod search;
pub mod tools;

pub use error::{Result, ToolkitError};
pub use knowledge::{KnowledgeHit, KnowledgeStore, MemoryKnowledgeStore};
pub use search::{DuckDuckGoClient, SearchClient, SearchHit};
pub use tools::{KnowledgeLookupTool, WeatherTool, WebSearchTool};
