//! HTTP/SSE Handlers

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use agent_core::{AgentConfig, ReactAgent, Run, RunOutcome, Step};

use crate::state::AppState;

/// Delay between replayed stream events, for readable client rendering
const STREAM_PACING: Duration = Duration::from_millis(50);

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_connected: bool,
    pub tool_count: usize,
}

#[derive(Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentQuery {
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AgentReply {
    pub answer: String,
    pub steps: Vec<Step>,
    pub iterations: usize,
    pub outcome: RunOutcome,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_connected = state.gateway.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_connected,
        tool_count: state.tools.len(),
    })
}

/// List registered tools
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolInfo>> {
    let tools = state
        .tools
        .iter()
        .map(|tool| ToolInfo {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
        })
        .collect();

    Json(tools)
}

/// Main agent endpoint (non-streaming)
pub async fn agent_chat(
    State(state): State<AppState>,
    Json(payload): Json<AgentQuery>,
) -> Result<Json<AgentReply>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = payload
        .session_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let run = execute_run(&state, &payload).await.map_err(|e| {
        tracing::error!("Agent error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "AGENT_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(AgentReply {
        answer: run.answer,
        steps: run.steps,
        iterations: run.iterations,
        outcome: run.outcome,
        session_id,
    }))
}

/// Streaming agent endpoint.
///
/// The reasoning loop runs to completion, then the recorded steps are
/// replayed to the client as SSE events with a short pacing delay so a
/// UI can show the thought process unfolding.
pub async fn agent_chat_stream(
    State(state): State<AppState>,
    Json(payload): Json<AgentQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = payload
        .session_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let events = match execute_run(&state, &payload).await {
        Ok(run) => replay_events(&run, &session_id),
        Err(e) => {
            tracing::error!("Agent error: {}", e);
            vec![
                json_event(serde_json::json!({
                    "type": "error",
                    "error": e.user_message(),
                })),
            ]
        }
    };

    let stream = futures::stream::iter(events).then(|event| async move {
        tokio::time::sleep(STREAM_PACING).await;
        Ok::<_, Infallible>(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ============================================================================
// Helpers
// ============================================================================

async fn execute_run(state: &AppState, payload: &AgentQuery) -> agent_core::Result<Run> {
    let config = AgentConfig {
        max_iterations: payload.max_iterations.unwrap_or(5),
        ..Default::default()
    };

    let agent = ReactAgent::new(state.gateway.clone(), state.tools.clone(), config);
    agent.run(&payload.question).await
}

/// Build the ordered event list for one finished run
fn replay_events(run: &Run, session_id: &str) -> Vec<Event> {
    let mut events = vec![json_event(serde_json::json!({
        "type": "session",
        "session_id": session_id,
    }))];

    for step in &run.steps {
        events.push(content_event(format!("Thought: {}", step.thought)));
        if let Some(action) = &step.action {
            let input = step.action_input.as_deref().unwrap_or("");
            events.push(content_event(format!("Action: {action}(\"{input}\")")));
        }
        if let Some(observation) = &step.observation {
            events.push(content_event(format!("Observation: {observation}")));
        }
    }

    events.push(json_event(serde_json::json!({
        "type": "done",
        "answer": run.answer,
        "iterations": run.iterations,
        "outcome": run.outcome,
    })));

    events
}

fn content_event(content: String) -> Event {
    json_event(serde_json::json!({
        "type": "content",
        "content": content,
    }))
}

fn json_event(payload: serde_json::Value) -> Event {
    Event::default().data(payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_events_shape() {
        let run = Run {
            question: "q".into(),
            answer: "42".into(),
            steps: vec![Step::action("look it up", "web_search", "answer", "42")],
            iterations: 2,
            outcome: RunOutcome::Answered,
        };

        let events = replay_events(&run, "s-1");
        // session + thought + action + observation + done
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_replay_stalled_step_has_no_action_line() {
        let run = Run {
            question: "q".into(),
            answer: "done".into(),
            steps: vec![Step::stalled("hmm", "please provide an Action or a Final Answer")],
            iterations: 2,
            outcome: RunOutcome::Answered,
        };

        let events = replay_events(&run, "s-2");
        // session + thought + observation + done
        assert_eq!(events.len(), 4);
    }
}
