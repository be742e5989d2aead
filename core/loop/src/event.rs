//! Transient notifications an [`crate::agent::Agent`] broadcasts while
//! running a turn, for a session's subscription surface.
//!
//! Distinct from [`lace_protocol::EventData`]: these are never persisted,
//! only delivered to whatever is currently subscribed. A subscriber that
//! isn't listening misses them; the thread's persisted events are always
//! fully replayable regardless.

use lace_protocol::ApprovalDecision;
use lace_protocol::ApprovalRequest;
use lace_protocol::ThreadId;

/// One notification from a running turn.
#[derive(Debug, Clone)]
pub enum LoopEvent {
    /// A new turn began constructing its prompt.
    TurnStarted { thread_id: ThreadId },
    /// Incremental assistant text, mirroring a transient `AGENT_TOKEN`.
    TextDelta { delta: String },
    /// Incremental reasoning text.
    ThinkingDelta { delta: String },
    /// A tool call's arguments finished accumulating and are about to run.
    ToolCallStarted { call_id: String, name: String },
    /// Arbitration needs a decision from whatever is driving the session.
    ToolApprovalRequested { request: ApprovalRequest },
    /// An approval request was resolved.
    ToolApprovalResolved {
        call_id: String,
        decision: ApprovalDecision,
    },
    /// A tool call finished.
    ToolResult { call_id: String, is_error: bool },
    /// The provider stream failed and the turn is retrying.
    Retry { attempt: u32, delay_ms: u64 },
    /// Compaction started because the budget reported `nearLimit`.
    CompactionStarted,
    /// Compaction finished; the budget has been reset.
    CompactionCompleted { tokens_saved: u64 },
    /// A turn completed normally.
    TurnCompleted { truncated: bool },
    /// The turn was stopped (cancellation or a `stop` approval decision).
    Stopped,
    /// The agent entered the `error` state.
    Error { message: String },
}

#[cfg(test)]
#[path = "event.test.rs"]
mod tests;
