//! Run Transcript
//!
//! Append-only log of reasoning steps. The rendered form is embedded in
//! every follow-up prompt, so rendering is a pure function of the step
//! sequence and its exact line format is part of the model-facing
//! contract.

use serde::{Deserialize, Serialize};

/// One thought/action/observation entry. Immutable once appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    /// The model's self-reported reasoning for this turn
    pub thought: String,

    /// Requested tool name, absent on stalled turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Raw tool argument, present iff `action` is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_input: Option<String>,

    /// Result fed back to the model on the next turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl Step {
    /// A tool-using turn
    pub fn action(
        thought: impl Into<String>,
        action: impl Into<String>,
        action_input: impl Into<String>,
        observation: impl Into<String>,
    ) -> Self {
        Self {
            thought: thought.into(),
            action: Some(action.into()),
            action_input: Some(action_input.into()),
            observation: Some(observation.into()),
        }
    }

    /// A turn without action or final answer, observation carries the
    /// recovery nudge
    pub fn stalled(thought: impl Into<String>, observation: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            action: None,
            action_input: None,
            observation: Some(observation.into()),
        }
    }
}

/// Ordered history of steps for one run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Transcript {
    steps: Vec<Step>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// All steps, insertion order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Consume into the step sequence
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the textual block embedded in follow-up prompts.
    ///
    /// Per step: a `Thought:` line, an `Action: name("input")` line when
    /// the step carried an action, and an `Observation:` line when one
    /// was recorded.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        for step in &self.steps {
            lines.push(format!("Thought: {}", step.thought));
            if let Some(action) = &step.action {
                let input = step.action_input.as_deref().unwrap_or("");
                lines.push(format!("Action: {}(\"{}\")", action, input));
            }
            if let Some(observation) = &step.observation {
                lines.push(format!("Observation: {}", observation));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_action_step() {
        let mut transcript = Transcript::new();
        transcript.push(Step::action("need math", "calculate", "2+2", "4"));

        assert_eq!(
            transcript.render(),
            "Thought: need math\nAction: calculate(\"2+2\")\nObservation: 4"
        );
    }

    #[test]
    fn test_render_stalled_step_omits_action_line() {
        let mut transcript = Transcript::new();
        transcript.push(Step::stalled("hmm", "please provide an Action or a Final Answer"));

        let rendered = transcript.render();
        assert!(!rendered.contains("Action:"));
        assert!(rendered.starts_with("Thought: hmm\nObservation: "));
    }

    #[test]
    fn test_render_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Step::action("first", "get_current_time", "", "monday"));
        transcript.push(Step::action("second", "calculate", "1+1", "2"));

        let rendered = transcript.render();
        let first = rendered.find("get_current_time").unwrap();
        let second = rendered.find("calculate").unwrap();
        assert!(first < second);
        assert!(rendered.contains("Action: get_current_time(\"\")"));
    }

    #[test]
    fn test_empty_transcript_renders_empty() {
        assert_eq!(Transcript::new().render(), "");
        assert!(Transcript::new().is_empty());
    }
}
