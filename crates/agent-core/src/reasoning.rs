//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern: build prompt, call the
//! model gateway, parse the completion, dispatch a tool or terminate,
//! append to the transcript, repeat up to a bound.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::gateway::ModelGateway;
use crate::parser::{parse_response, Directive};
use crate::prompt::{render_prompt, DEFAULT_PREAMBLE};
use crate::tool::ToolRegistry;
use crate::transcript::{Step, Transcript};

/// Observation fed back when a turn carries neither an action nor a
/// final answer.
pub const STALL_NUDGE: &str = "please provide an Action or a Final Answer";

/// Answer returned when the iteration budget runs out.
pub const BUDGET_EXHAUSTED_ANSWER: &str =
    "could not complete within the iteration budget";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Instruction block placed ahead of the tool listing
    pub preamble: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.into(),
            max_iterations: 5,
        }
    }
}

/// How a run terminated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The model emitted a final answer
    Answered,

    /// The iteration budget ran out first
    Exhausted,
}

/// Complete result of one loop invocation. Owned by the caller; the
/// loop never persists it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run {
    pub question: String,
    pub answer: String,
    pub steps: Vec<Step>,
    /// 1-based count of model calls made
    pub iterations: usize,
    pub outcome: RunOutcome,
}

/// The ReAct agent: a reasoning loop over a gateway and a tool registry.
///
/// Both collaborators are shared read-only, so one agent value serves
/// any number of concurrent runs.
pub struct ReactAgent {
    gateway: Arc<dyn ModelGateway>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl ReactAgent {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            gateway,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(gateway: Arc<dyn ModelGateway>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(gateway, tools, AgentConfig::default())
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run the loop on one question.
    ///
    /// Always returns a complete [`Run`] (answered or exhausted) unless
    /// the gateway itself fails, which is the one hard failure: without
    /// its completion the next prompt cannot be built. The question is
    /// forwarded as-is; input validation belongs to the transport layer.
    pub async fn run(&self, question: &str) -> Result<Run> {
        let tool_listing = self.tools.describe_all();
        let mut transcript = Transcript::new();

        for iteration in 1..=self.config.max_iterations {
            let prompt = render_prompt(
                &self.config.preamble,
                &tool_listing,
                question,
                &transcript,
            );

            tracing::debug!(iteration, "calling model gateway");
            let response = self.gateway.generate(&prompt).await?;

            let decision = parse_response(&response);

            match decision.directive {
                Directive::FinalAnswer(answer) => {
                    tracing::info!(iteration, "run answered");
                    // The terminal turn is not appended; only tool-using
                    // and stalled turns populate the transcript.
                    return Ok(Run {
                        question: question.into(),
                        answer,
                        steps: transcript.into_steps(),
                        iterations: iteration,
                        outcome: RunOutcome::Answered,
                    });
                }
                Directive::Invoke { name, input } => {
                    tracing::debug!(tool = %name, "executing tool");
                    let observation = self.dispatch(&name, &input).await;
                    transcript.push(Step::action(decision.thought, name, input, observation));
                }
                Directive::Stalled => {
                    tracing::debug!(iteration, "stalled turn, nudging");
                    transcript.push(Step::stalled(decision.thought, STALL_NUDGE));
                }
            }
        }

        tracing::warn!(
            max_iterations = self.config.max_iterations,
            "iteration budget exhausted"
        );

        Ok(Run {
            question: question.into(),
            answer: BUDGET_EXHAUSTED_ANSWER.into(),
            steps: transcript.into_steps(),
            iterations: self.config.max_iterations,
            outcome: RunOutcome::Exhausted,
        })
    }

    /// Resolve one action request to an observation. Tool-level trouble
    /// of every kind comes back as an observation, never as a loop
    /// failure.
    async fn dispatch(&self, name: &str, input: &str) -> String {
        let Some(tool) = self.tools.get(name) else {
            return format!(
                "unknown tool: {}; available tools: {}",
                name,
                self.tools.names().join(", ")
            );
        };

        match tool.invoke(input).await {
            Ok(result) => {
                if result.success {
                    result.data.unwrap_or_default()
                } else {
                    format!("error: {}", result.error.unwrap_or_default())
                }
            }
            Err(e) => format!("tool execution exception: {}", e),
        }
    }
}

/// Builder for agent construction
pub struct AgentBuilder {
    gateway: Option<Arc<dyn ModelGateway>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            gateway: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn gateway(mut self, gateway: Arc<dyn ModelGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.config.preamble = preamble.into();
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<ReactAgent> {
        let gateway = self
            .gateway
            .ok_or_else(|| AgentError::Config("Gateway is required".into()))?;

        Ok(ReactAgent::new(gateway, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{Tool, ToolResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Gateway that replays scripted completions in order.
    struct ScriptedGateway {
        responses: Mutex<Vec<Result<String>>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Ok("Thought: nothing left to say".into());
            }
            responses.remove(0)
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echo the argument back"
        }
        async fn invoke(&self, input: &str) -> Result<ToolResult> {
            Ok(ToolResult::success(input))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "always blows up"
        }
        async fn invoke(&self, _input: &str) -> Result<ToolResult> {
            Err(AgentError::ToolExecution("socket closed".into()))
        }
    }

    struct FakeCalculator;

    #[async_trait]
    impl Tool for FakeCalculator {
        fn name(&self) -> &str {
            "calculate"
        }
        fn description(&self) -> &str {
            "evaluate a mathematical expression"
        }
        async fn invoke(&self, _input: &str) -> Result<ToolResult> {
            Ok(ToolResult::success("4"))
        }
    }

    fn agent_with(
        responses: Vec<Result<String>>,
        tools: ToolRegistry,
        max_iterations: usize,
    ) -> ReactAgent {
        ReactAgent::new(
            Arc::new(ScriptedGateway::new(responses)),
            Arc::new(tools),
            AgentConfig {
                max_iterations,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_end_to_end_tool_then_answer() {
        let mut tools = ToolRegistry::new();
        tools.register(FakeCalculator);

        let agent = agent_with(
            vec![
                Ok("Thought: 需要计算\nAction: calculate(\"2+2\")".into()),
                Ok("Thought: 已得到结果\nFinal Answer: 4".into()),
            ],
            tools,
            5,
        );

        let run = agent.run("2+2 等于几").await.unwrap();
        assert_eq!(run.answer, "4");
        assert_eq!(run.iterations, 2);
        assert_eq!(run.outcome, RunOutcome::Answered);
        assert_eq!(run.steps.len(), 1);
        assert_eq!(run.steps[0].observation.as_deref(), Some("4"));
        assert_eq!(run.steps[0].action.as_deref(), Some("calculate"));
    }

    #[tokio::test]
    async fn test_immediate_final_answer_has_no_steps() {
        let agent = agent_with(
            vec![Ok("Thought: trivial\nFinal Answer: Paris".into())],
            ToolRegistry::new(),
            5,
        );

        let run = agent.run("capital of France?").await.unwrap();
        assert_eq!(run.answer, "Paris");
        assert_eq!(run.iterations, 1);
        assert!(run.steps.is_empty());
    }

    #[tokio::test]
    async fn test_budget_exhaustion() {
        let responses = (0..3)
            .map(|_| Ok("Thought: hmm\nAction: echo(\"again\")".into()))
            .collect();

        let mut tools = ToolRegistry::new();
        tools.register(EchoTool);

        let agent = agent_with(responses, tools, 3);
        let run = agent.run("never ends").await.unwrap();

        assert_eq!(run.outcome, RunOutcome::Exhausted);
        assert_eq!(run.iterations, 3);
        assert_eq!(run.steps.len(), 3);
        assert_eq!(run.answer, BUDGET_EXHAUSTED_ANSWER);
    }

    #[tokio::test]
    async fn test_stalled_turn_gets_nudge_and_continues() {
        let agent = agent_with(
            vec![
                Ok("I forgot the protocol entirely.".into()),
                Ok("Final Answer: recovered".into()),
            ],
            ToolRegistry::new(),
            5,
        );

        let run = agent.run("q").await.unwrap();
        assert_eq!(run.answer, "recovered");
        assert_eq!(run.iterations, 2);
        assert_eq!(run.steps.len(), 1);
        assert!(run.steps[0].action.is_none());
        assert_eq!(run.steps[0].observation.as_deref(), Some(STALL_NUDGE));
    }

    #[tokio::test]
    async fn test_unknown_tool_lists_registered_names() {
        let mut tools = ToolRegistry::new();
        tools.register(EchoTool);
        tools.register(FakeCalculator);

        let agent = agent_with(
            vec![
                Ok("Thought: try something\nAction: teleport(\"moon\")".into()),
                Ok("Final Answer: ok".into()),
            ],
            tools,
            5,
        );

        let run = agent.run("q").await.unwrap();
        assert_eq!(run.answer, "ok");
        let observation = run.steps[0].observation.as_deref().unwrap();
        assert!(observation.starts_with("unknown tool: teleport"));
        assert!(observation.contains("echo, calculate"));
    }

    #[tokio::test]
    async fn test_tool_exception_is_isolated() {
        let mut tools = ToolRegistry::new();
        tools.register(BrokenTool);

        let agent = agent_with(
            vec![
                Ok("Thought: risky\nAction: broken(\"x\")".into()),
                Ok("Final Answer: survived".into()),
            ],
            tools,
            5,
        );

        let run = agent.run("q").await.unwrap();
        assert_eq!(run.answer, "survived");
        let observation = run.steps[0].observation.as_deref().unwrap();
        assert!(observation.starts_with("tool execution exception:"));
        assert!(observation.contains("socket closed"));
    }

    #[tokio::test]
    async fn test_failed_tool_result_becomes_error_observation() {
        struct Refusing;

        #[async_trait]
        impl Tool for Refusing {
            fn name(&self) -> &str {
                "refusing"
            }
            fn description(&self) -> &str {
                "always refuses"
            }
            async fn invoke(&self, _input: &str) -> Result<ToolResult> {
                Ok(ToolResult::failure("bad argument"))
            }
        }

        let mut tools = ToolRegistry::new();
        tools.register(Refusing);

        let agent = agent_with(
            vec![
                Ok("Action: refusing(\"x\")".into()),
                Ok("Final Answer: done".into()),
            ],
            tools,
            5,
        );

        let run = agent.run("q").await.unwrap();
        assert_eq!(
            run.steps[0].observation.as_deref(),
            Some("error: bad argument")
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let agent = agent_with(
            vec![Err(AgentError::GatewayUnavailable("connection refused".into()))],
            ToolRegistry::new(),
            5,
        );

        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, AgentError::GatewayUnavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_question_is_accepted() {
        let agent = agent_with(
            vec![Ok("Final Answer: nothing asked".into())],
            ToolRegistry::new(),
            5,
        );

        let run = agent.run("").await.unwrap();
        assert_eq!(run.outcome, RunOutcome::Answered);
    }

    #[tokio::test]
    async fn test_builder() {
        let agent = AgentBuilder::new()
            .gateway(Arc::new(ScriptedGateway::new(vec![Ok(
                "Final Answer: built".into()
            )])))
            .tool(EchoTool)
            .max_iterations(2)
            .build()
            .unwrap();

        assert_eq!(agent.config().max_iterations, 2);
        assert_eq!(agent.tools().len(), 1);

        let run = agent.run("q").await.unwrap();
        assert_eq!(run.answer, "built");
    }

    #[test]
    fn test_builder_requires_gateway() {
        assert!(AgentBuilder::new().build().is_err());
    }
}
