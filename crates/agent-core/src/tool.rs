//! Tool System
//!
//! Uniform capability contract for the reasoning loop: every tool has a
//! stable name, a one-line description injected verbatim into prompts,
//! and a single-string `invoke`. Tools parse their own sub-arguments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// Outcome of one tool invocation.
///
/// Exactly one of `data` / `error` is populated; the constructors below
/// are the only intended way to build one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether execution succeeded
    pub success: bool,

    /// Payload, present iff success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Failure message, present iff not success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Tool trait - implement to add new capabilities.
///
/// `invoke` receives the raw action input, possibly empty for
/// zero-argument calls. Returning `Err` models an unexpected internal
/// fault; expected failures (bad input, upstream unavailable) belong in
/// `ToolResult::failure` so the model can read them as an observation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique stable identifier
    fn name(&self) -> &str;

    /// One-line capability summary, shown to the model in every prompt
    fn description(&self) -> &str;

    /// Execute with the given input string
    async fn invoke(&self, input: &str) -> Result<ToolResult>;
}

/// Registry for available tools.
///
/// Registration order is part of the model-facing contract: the
/// capability listing built by `describe_all` is embedded verbatim in
/// every prompt, so tools are kept in insertion order rather than in a
/// hash map.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a new tool. Re-registering a name replaces the previous
    /// instance in place; the last registration wins.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_boxed(Arc::new(tool));
    }

    /// Register a boxed tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        if let Some(existing) = self
            .tools
            .iter_mut()
            .find(|t| t.name() == tool.name())
        {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Iterate over tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Capability listing for prompt construction: one line per tool,
    /// `- {name}: {description}`, in registration order.
    pub fn describe_all(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// Current-time tool. Zero-argument; the input string is ignored.
pub struct TimeTool;

#[async_trait]
impl Tool for TimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time with calendar facts (weekday, quarter, leap year); takes no argument"
    }

    async fn invoke(&self, _input: &str) -> Result<ToolResult> {
        let now = chrono::Local::now();
        let date = now.date_naive();

        let year = chrono::Datelike::year(&date);
        let month = chrono::Datelike::month(&date);
        let day = chrono::Datelike::day(&date);
        let weekday = date.format("%A").to_string();
        let day_of_year = chrono::Datelike::ordinal(&date);
        let day_of_week = chrono::Datelike::weekday(&date).number_from_monday();
        let is_leap_year = chrono::NaiveDate::from_ymd_opt(year, 2, 29).is_some();
        let days_in_month = days_in_month(year, month);
        let quarter = (month - 1) / 3 + 1;

        let facts = serde_json::json!({
            "formatted_time": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            "year": year,
            "month": month,
            "day": day,
            "weekday": weekday,
            "quarter": quarter,
            "is_leap_year": is_leap_year,
            "day_of_year": day_of_year,
            "day_of_week": day_of_week,
            "days_in_month": days_in_month,
            "is_month_end": day == days_in_month,
            "is_weekend": day_of_week >= 6,
            "timestamp": now.timestamp(),
        });

        Ok(ToolResult::success(facts.to_string()))
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first = chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_default();
    let next = chrono::NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .unwrap_or_default();
    next.signed_duration_since(first).num_days() as u32
}

/// Calculator tool - evaluates mathematical expressions
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression; the argument is the expression string, e.g. '123*456'"
    }

    async fn invoke(&self, input: &str) -> Result<ToolResult> {
        if input.trim().is_empty() {
            return Ok(ToolResult::failure("expression required"));
        }

        match evaluate_expression(input) {
            Ok(result) => Ok(ToolResult::success(format_number(result))),
            Err(e) => Ok(ToolResult::failure(e)),
        }
    }
}

/// Render without a trailing `.0` for whole results, so the model sees
/// `4` rather than `4.0` for integer arithmetic.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Recursive evaluator for `+ - * / ^` with parentheses, splitting at
/// the lowest-precedence operator first. Good enough for the arithmetic
/// the model asks for; anything heavier belongs in a real parser crate.
fn evaluate_expression(expr: &str) -> std::result::Result<f64, String> {
    let expr = expr.replace(' ', "");

    // Handle parentheses recursively
    if let Some(start) = expr.rfind('(') {
        if let Some(end) = expr[start..].find(')') {
            let inner = &expr[start + 1..start + end];
            let inner_result = evaluate_expression(inner)?;
            let new_expr = format!(
                "{}{}{}",
                &expr[..start],
                inner_result,
                &expr[start + end + 1..]
            );
            return evaluate_expression(&new_expr);
        }
    }

    // Addition/subtraction (lowest precedence, evaluated last)
    for (i, c) in expr.char_indices().rev() {
        if i > 0 && (c == '+' || c == '-') {
            // A sign preceded by an operator is unary, not a split point.
            // `i` is a byte offset, so inspect the preceding char by slice.
            let prev_char = expr[..i].chars().last().unwrap_or(' ');
            if prev_char.is_ascii_digit() || prev_char == ')' {
                let left = evaluate_expression(&expr[..i])?;
                let right = evaluate_expression(&expr[i + 1..])?;
                return Ok(if c == '+' { left + right } else { left - right });
            }
        }
    }

    // Multiplication/division
    for (i, c) in expr.char_indices().rev() {
        if c == '*' || c == '/' {
            let left = evaluate_expression(&expr[..i])?;
            let right = evaluate_expression(&expr[i + 1..])?;
            if c == '/' && right == 0.0 {
                return Err("Division by zero".into());
            }
            return Ok(if c == '*' { left * right } else { left / right });
        }
    }

    // Power
    if let Some(i) = expr.find('^') {
        let left = evaluate_expression(&expr[..i])?;
        let right = evaluate_expression(&expr[i + 1..])?;
        return Ok(left.powf(right));
    }

    // Parse number
    expr.parse::<f64>().map_err(|e| format!("Parse error: {}", e))
}
