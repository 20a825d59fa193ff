//! Prompt Construction
//!
//! Pure functions from (preamble, tool listing, question, transcript) to
//! the text sent to the model gateway, so the loop is replayable in
//! tests without a live model.

use crate::transcript::Transcript;

/// Default instruction block. The tool listing and question are spliced
/// in by [`render_prompt`].
pub const DEFAULT_PREAMBLE: &str = "You are an assistant that solves problems with the ReAct pattern: \
alternate short reasoning with tool calls until you can answer.";

/// Render the full prompt for one iteration.
///
/// The first iteration carries no history section; follow-up iterations
/// append the rendered transcript so the model sees every observation
/// produced so far.
pub fn render_prompt(
    preamble: &str,
    tool_listing: &str,
    question: &str,
    transcript: &Transcript,
) -> String {
    let mut prompt = format!(
        "{preamble}\n\n\
         ## Available tools\n{tool_listing}\n\n\
         ## Response format\n\
         Thought: reason about what to do next\n\
         Action: tool_name(\"argument\")\n\n\
         When you have enough information:\n\
         Thought: I have enough information\n\
         Final Answer: the answer\n\n\
         ## Question\n{question}\n\n\
         ## Begin"
    );

    if !transcript.is_empty() {
        prompt.push_str(&format!(
            "\n\n## History\n{}\n\n## Continue",
            transcript.render()
        ));
    }

    prompt
}
