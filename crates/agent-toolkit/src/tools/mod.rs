//! Agent-facing tools built on the toolkit's backends

pub mod knowledge_lookup;
pub mod weather;
pub mod web_search;

pub use knowledge_lookup::KnowledgeLookupTool;
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;
