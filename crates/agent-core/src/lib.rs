//! # agent-core
//!
//! The ReAct reasoning-action control loop: repeated model calls,
//! free-text parsing into structured decisions, tool dispatch against a
//! registry, and an auditable transcript, terminating on a final answer
//! or an iteration budget.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ReactAgent                             │
//! │  ┌───────────┐  ┌────────┐  ┌──────────────┐  ┌───────────┐  │
//! │  │ Reasoning │──│ Parser │  │ ToolRegistry │  │ Model     │  │
//! │  │   Loop    │──│        │──│              │──│ Gateway   │  │
//! │  └───────────┘  └────────┘  └──────────────┘  └───────────┘  │
//! │        └── Transcript (Thought / Action / Observation) ──┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `ModelGateway` trait is the only seam to the model backend;
//! everything else (HTTP transport, persistence, retrieval) layers
//! outside this crate.

pub mod error;
pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod reasoning;
pub mod tool;
pub mod transcript;

pub use error::{AgentError, Result};
pub use gateway::ModelGateway;
pub use parser::{parse_response, Decision, Directive};
pub use reasoning::{AgentBuilder, AgentConfig, ReactAgent, Run, RunOutcome};
pub use tool::{Tool, ToolRegistry, ToolResult};
pub use transcript::{Step, Transcript};
