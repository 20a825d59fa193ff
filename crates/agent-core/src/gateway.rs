//! Model Gateway
//!
//! Single seam between the reasoning loop and whatever serves the
//! language model. The loop only ever needs one completion per prompt;
//! transport mechanics (HTTP, retries, streaming) live behind this trait.

use async_trait::async_trait;

use crate::error::Result;

/// Strategy trait for model backends.
///
/// Implementations must be safe to share across concurrent runs; the
/// loop holds the gateway behind an `Arc` and never locks around the
/// `generate` call.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate one completion for a fully rendered prompt.
    ///
    /// Errors propagate to the caller of `run` as a hard failure; the
    /// loop performs no internal retries.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check whether the backend is reachable and configured correctly.
    async fn health_check(&self) -> Result<bool>;

    /// Backend name, for logs and the health endpoint.
    fn name(&self) -> &str;
}
