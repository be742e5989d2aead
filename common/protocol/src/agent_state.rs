//! The agent's turn-level state machine.

use serde::Deserialize;
use serde::Serialize;

/// Where an agent is within its current turn.
///
/// Transitions follow a fixed cycle driven by `core/loop`:
/// `idle -> thinking -> streaming -> (awaiting_tool -> thinking)* -> idle`,
/// with `stopping`/`stopped` reachable from any state on cancellation and
/// `error` reachable from any state on an unrecoverable failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Waiting for `sendMessage`.
    #[default]
    Idle,
    /// Prompt constructed, stream requested, no content received yet.
    Thinking,
    /// Receiving `TextDelta`/`ThinkingDelta` events from the provider.
    Streaming,
    /// Stream finished with `tool_use`; tool calls are executing.
    AwaitingTool,
    /// Cancellation requested; draining in-flight work.
    Stopping,
    /// Cancellation complete.
    Stopped,
    /// Unrecoverable failure; the agent cannot continue without
    /// intervention.
    Error,
}

impl AgentState {
    /// Whether `sendMessage` may be accepted in this state.
    pub fn accepts_input(&self) -> bool {
        matches!(self, AgentState::Idle)
    }

    /// Whether the agent is in the middle of a turn.
    pub fn is_busy(&self) -> bool {
        !matches!(self, AgentState::Idle | AgentState::Stopped | AgentState::Error)
    }
}

#[cfg(test)]
#[path = "agent_state.test.rs"]
mod tests;
