//! Events a [`crate::Provider`] stream emits while completing one turn.

use serde_json::Value;

use lace_protocol::TokenUsage;

/// Why a provider stream stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The model produced a complete response with no pending tool calls.
    EndTurn,
    /// The model wants one or more tools executed before continuing.
    ToolUse,
    /// The model hit its output token limit mid-response.
    MaxTokens,
    /// A configured stop sequence was matched.
    StopSequence,
    /// The provider itself failed (network, rate limit, 5xx, ...).
    Error,
}

impl FinishReason {
    /// Whether this reason represents an error the agent loop may retry.
    pub fn is_error(&self) -> bool {
        matches!(self, FinishReason::Error)
    }
}

/// One event from a [`crate::Provider::complete`] stream.
///
/// A single producer per call, finite (always terminated by exactly one
/// [`ProviderEvent::Finish`]), and safe to stop consuming early on
/// cancellation without the producer panicking.
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// Incremental assistant text.
    TextDelta(String),
    /// Incremental "reasoning" text, for models that expose it.
    ThinkingDelta(String),
    /// A new tool call has begun; `name` is final, `args` accumulate via
    /// [`ProviderEvent::ToolCallArgsDelta`].
    ToolCallStart { call_id: String, name: String },
    /// Incremental JSON fragment of a tool call's arguments.
    ToolCallArgsDelta { call_id: String, delta: String },
    /// A tool call's arguments are complete and ready to validate.
    ToolCallEnd { call_id: String, args: Value },
    /// Token usage for the turn. May arrive more than once; the agent
    /// loop records each occurrence into the budget.
    Usage(TokenUsage),
    /// The stream has ended; no further events follow.
    Finish(FinishReason),
}

#[cfg(test)]
#[path = "event.test.rs"]
mod tests;
