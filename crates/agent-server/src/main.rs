//! react-agent HTTP Server
//!
//! Axum-based server exposing the reasoning loop over REST and SSE.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::tool::{CalculatorTool, TimeTool, ToolRegistry};
use agent_core::ModelGateway;
use agent_runtime::OllamaGateway;
use agent_toolkit::{
    DuckDuckGoClient, KnowledgeLookupTool, MemoryKnowledgeStore, SearchClient, WeatherTool,
    WebSearchTool,
};

use crate::handlers::{agent_chat, agent_chat_stream, health_check, list_tools};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize model gateway
    let gateway: Arc<dyn ModelGateway> = Arc::new(OllamaGateway::from_env());

    // Verify Ollama connection
    match gateway.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - agent will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Initialize knowledge base
    let knowledge = MemoryKnowledgeStore::new();
    if let Ok(dir) = std::env::var("KNOWLEDGE_DIR") {
        match knowledge.load_dir(&dir) {
            Ok(count) => tracing::info!("✓ Loaded {} knowledge documents from {}", count, dir),
            Err(e) => tracing::warn!("⚠ Could not load knowledge dir {}: {}", dir, e),
        }
    }
    let knowledge = Arc::new(knowledge);

    // Initialize tools
    let search: Arc<dyn SearchClient> = Arc::new(DuckDuckGoClient::new());

    let mut tools = ToolRegistry::new();

    tools.register(TimeTool);
    tools.register(CalculatorTool);
    tools.register(WeatherTool::new(search.clone()));
    tools.register(WebSearchTool::new(search));
    tools.register(KnowledgeLookupTool::new(knowledge));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Build application state
    let state = AppState {
        gateway,
        tools: Arc::new(tools),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/agent/tools", get(list_tools))
        .route("/api/agent/chat", post(agent_chat))
        .route("/api/agent/chat/stream", post(agent_chat_stream))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 react-agent server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  GET  /api/agent/tools         - List registered tools");
    tracing::info!("  POST /api/agent/chat          - Ask a question");
    tracing::info!("  POST /api/agent/chat/stream   - Ask with SSE step replay");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
