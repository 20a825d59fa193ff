//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Model gateway error (bad response, protocol failure)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Gateway unavailable or not responding
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// Tool execution failed in an unexpected way
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::GatewayUnavailable(_) | AgentError::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Gateway(msg) => format!("The AI service encountered an error: {}", msg),
            AgentError::GatewayUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            AgentError::ToolExecution(msg) => format!("Tool error: {}", msg),
            AgentError::Config(msg) => format!("Configuration problem: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
