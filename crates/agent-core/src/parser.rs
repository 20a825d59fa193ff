//! Response Parser
//!
//! Turns one opaque model completion into a structured [`Decision`].
//! The model writes free text against a `Thought:` / `Action:` /
//! `Final Answer:` protocol and drifts from it constantly, so parsing
//! is a cascade of increasingly permissive matchers that never fails:
//! unparseable text degrades to a stalled turn, and the loop nudges the
//! model back on format through the next observation.

use std::sync::OnceLock;

use regex::Regex;

/// What the model asked for this turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Requested tool invocation
    Invoke { name: String, input: String },

    /// Terminal answer; always wins when an action appears in the same
    /// completion
    FinalAnswer(String),

    /// Neither marker found - a no-op turn, not a parse error
    Stalled,
}

/// Structured form of one model completion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Free-text reasoning, may be empty
    pub thought: String,

    pub directive: Directive,
}

fn thought_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Thought:\s*(.+?)(?:Action:|Final Answer:|$)").unwrap()
    })
}

fn final_answer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)Final Answer:\s*(.+)$").unwrap())
}

/// Ordered from strict call syntax down to a bare tool name; the first
/// match wins and the rest are not tried.
fn action_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r#"Action:\s*(\w+)\s*\(\s*["']?([^"']*)["']?\s*\)"#).unwrap(),
            Regex::new(r"Action:\s*(\w+)\s*\(([^)]*)\)").unwrap(),
            Regex::new(r"Action:\s*(\w+)").unwrap(),
        ]
    })
}

/// Parse one raw completion. Never errors.
pub fn parse_response(text: &str) -> Decision {
    let thought = thought_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    // Terminal state wins: a completion carrying both an Action and a
    // Final Answer is treated as answered.
    if let Some(captures) = final_answer_re().captures(text) {
        let answer = captures[1].trim().to_string();
        return Decision {
            thought,
            directive: Directive::FinalAnswer(answer),
        };
    }

    for pattern in action_res() {
        if let Some(captures) = pattern.captures(text) {
            let name = captures[1].trim().to_string();
            let input = captures
                .get(2)
                .map(|m| m.as_str().trim().trim_matches(['"', '\'']).to_string())
                .unwrap_or_default();
            return Decision {
                thought,
                directive: Directive::Invoke { name, input },
            };
        }
    }

    Decision {
        thought,
        directive: Directive::Stalled,
    }
}
