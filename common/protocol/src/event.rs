//! The persisted event taxonomy.
//!
//! A thread is nothing but an ordered sequence of [`Event`]s. The
//! [`EventData`] tag is closed: an event kind not in this enum cannot be
//! constructed, and an unrecognized `type` tag on deserialize is a decode
//! error rather than a silently-dropped variant.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::approval::ApprovalDecision;
use crate::approval::ApprovalRequest;
use crate::thread_id::ThreadId;
use crate::token_usage::TokenUsage;
use crate::tool::ToolResultContent;
use crate::tool::ToolStatus;

/// One entry in a thread's event log.
///
/// `seq` is strictly increasing within a thread and is the only ordering a
/// reader may rely on; events carry no wall-clock guarantee relative to
/// other threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Thread this event belongs to.
    pub thread_id: ThreadId,
    /// Position within the thread, starting at 0. Strictly increasing;
    /// the only ordering a reader may rely on.
    pub seq: u64,
    /// Wall-clock instant the event was appended. Monotonic within a
    /// thread since it is stamped in `seq` order; ties (possible under a
    /// coarse clock) are broken by `seq`.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub data: EventData,
}

impl Event {
    /// Build an event, stamping `timestamp` as now. Callers append
    /// through the thread store, which assigns `seq`; this constructor
    /// exists for tests and for the store implementation itself.
    pub fn new(thread_id: ThreadId, seq: u64, data: EventData) -> Self {
        Self {
            thread_id,
            seq,
            timestamp: Utc::now(),
            data,
        }
    }

    /// Shorthand for matching on the event's kind without destructuring.
    pub fn kind(&self) -> &'static str {
        self.data.kind()
    }
}

/// The closed set of event payloads a thread can contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventData {
    /// User-authored text, appended by the session.
    UserMessage {
        /// The message text.
        text: String,
    },

    /// A completed assistant turn: full text plus usage for that turn.
    ///
    /// Never emitted for a turn that produced only tool calls and no text.
    AgentMessage {
        /// Full assistant text for the turn.
        text: String,
        /// Token usage charged to this turn.
        usage: TokenUsage,
        /// Set when the provider stopped on `max_tokens` rather than
        /// `end_turn`.
        #[serde(default)]
        truncated: bool,
    },

    /// An incremental text fragment. Transient: never persisted to a
    /// thread, only ever broadcast to live subscribers.
    AgentToken {
        /// The delta since the previous fragment.
        delta: String,
    },

    /// A provider "reasoning" span, opaque to the agent loop.
    AgentThinking {
        /// Thinking text for this span.
        text: String,
    },

    /// A validated tool call the agent loop has decided to execute.
    ToolCall {
        /// Id unique within the thread.
        call_id: String,
        /// Name of the tool being invoked.
        name: String,
        /// Validated arguments.
        arguments: serde_json::Value,
    },

    /// The terminal result of one tool call.
    ToolResult {
        /// Id of the call this result answers.
        call_id: String,
        /// How the call ended.
        status: ToolStatus,
        /// Result content blocks shown to the model.
        content: Vec<ToolResultContent>,
        /// Whether `content` represents an error.
        is_error: bool,
    },

    /// A tool call is blocked pending approval. Transient while
    /// unresolved: broadcast only. Once a decision arrives, both this
    /// request and the matching [`EventData::ToolApprovalResponse`] are
    /// appended together, so the audit trail carries only resolved pairs.
    ToolApprovalRequest {
        /// The pending request.
        request: ApprovalRequest,
    },

    /// The resolution of a [`EventData::ToolApprovalRequest`].
    ToolApprovalResponse {
        /// Id of the call the decision applies to.
        call_id: String,
        /// The decision reached.
        decision: ApprovalDecision,
    },

    /// An operator-visible diagnostic, e.g. a fatal error or a retry
    /// notice, surfaced in the transcript rather than only logged.
    LocalSystemMessage {
        /// The diagnostic text.
        text: String,
    },

    /// A compaction: the synthetic replacement for a contiguous prefix of
    /// earlier events. `replacement` is itself a sequence of events (most
    /// commonly a single summarizing `AgentMessage`) that stands in for
    /// everything compacted away.
    Compaction {
        /// Identifier of the strategy that produced this compaction.
        strategy_id: String,
        /// Number of events the replacement stands in for.
        original_event_count: u64,
        /// The events that now represent the compacted prefix.
        replacement: Vec<EventData>,
    },
}

impl EventData {
    /// The event's `type` tag, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            EventData::UserMessage { .. } => "user_message",
            EventData::AgentMessage { .. } => "agent_message",
            EventData::AgentToken { .. } => "agent_token",
            EventData::AgentThinking { .. } => "agent_thinking",
            EventData::ToolCall { .. } => "tool_call",
            EventData::ToolResult { .. } => "tool_result",
            EventData::ToolApprovalRequest { .. } => "tool_approval_request",
            EventData::ToolApprovalResponse { .. } => "tool_approval_response",
            EventData::LocalSystemMessage { .. } => "local_system_message",
            EventData::Compaction { .. } => "compaction",
        }
    }

    /// Whether this event kind is transient: it may be broadcast to live
    /// subscribers but is never written to the thread store.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EventData::AgentToken { .. } | EventData::ToolApprovalRequest { .. }
        )
    }

    /// The usage this event charges to the token budget, if any.
    pub fn usage(&self) -> Option<TokenUsage> {
        match self {
            EventData::AgentMessage { usage, .. } => Some(*usage),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "event.test.rs"]
mod tests;
