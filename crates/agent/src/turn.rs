//! Turn outcomes and progress events.

use serde_json::Value;

/// Reply used when the model produced nothing usable.
pub const EMPTY_RESPONSE_REPLY: &str = "Sorry, I couldn't process that.";

/// Reply used when the iteration budget ran out with no text to show.
pub const BUDGET_EXCEEDED_REPLY: &str = "Sorry, I couldn't resolve that in a few steps.";

pub const CANCELLED_REPLY: &str = "Turn cancelled.";

/// How one user turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnResult {
    /// The model answered with text and asked for no further tools.
    Success(String),

    /// The model was still calling tools when the iteration budget ran out.
    /// `partial` is the last non-empty text the model produced this turn.
    BudgetExceeded { partial: Option<String> },

    /// The model returned no content, or only blank text.
    EmptyResponse,

    /// The model call failed or timed out.
    Failed(String),

    /// The turn was interrupted between iterations.
    Cancelled,
}

impl TurnResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Text to show the user for this outcome.
    pub fn text(&self) -> String {
        match self {
            Self::Success(text) => text.clone(),
            Self::BudgetExceeded { partial: Some(text) } => text.clone(),
            Self::BudgetExceeded { partial: None } => BUDGET_EXCEEDED_REPLY.to_string(),
            Self::EmptyResponse => EMPTY_RESPONSE_REPLY.to_string(),
            Self::Failed(reason) => format!("Sorry, something went wrong: {reason}"),
            Self::Cancelled => CANCELLED_REPLY.to_string(),
        }
    }
}

/// Progress reported while a turn runs.
#[derive(Debug)]
pub enum TurnEvent<'a> {
    /// A text block from the model, emitted in response order.
    AssistantText(&'a str),

    /// The model asked for a tool.
    ToolCall { name: &'a str, input: &'a Value },

    /// A tool finished. `output` is exactly what the model will see.
    ToolResult {
        name: &'a str,
        output: &'a str,
        success: bool,
    },
}
