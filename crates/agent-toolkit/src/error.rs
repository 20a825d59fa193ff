//! Error Types for the Toolkit

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolkitError>;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Search error: {0}")]
    Search(String),

    #[error("Knowledge store error: {0}")]
    Knowledge(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
