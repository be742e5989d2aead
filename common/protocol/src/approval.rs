//! Approval request/response types exchanged between the tool executor and
//! whatever is driving the session (a human, or an automated policy).

use serde::Deserialize;
use serde::Serialize;

use crate::tool::RiskLevel;

/// A tool call awaiting approval, broadcast to subscribers as a transient
/// event. Only resolved once a matching [`ApprovalDecision`] arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Id of the tool call this request guards.
    pub call_id: String,
    /// Name of the tool being invoked.
    pub tool_name: String,
    /// Risk classification that triggered the approval gate.
    pub risk: RiskLevel,
    /// Short human-readable description of what the call will do.
    pub description: String,
}

impl ApprovalRequest {
    /// Build a request for a given call id, tool, and risk level.
    pub fn new(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        risk: RiskLevel,
        description: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            risk,
            description: description.into(),
        }
    }
}

/// The decision returned for one [`ApprovalRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Approve this call only.
    AllowOnce,
    /// Approve this call and cache the decision for the rest of the
    /// session (not persisted beyond it).
    AllowSession,
    /// Deny this call; the executor appends a failed `TOOL_RESULT`.
    Deny,
    /// Deny this call and halt the whole agent loop.
    Stop,
}

impl ApprovalDecision {
    /// Whether this decision permits the call to run.
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            ApprovalDecision::AllowOnce | ApprovalDecision::AllowSession
        )
    }

    /// Whether this decision should halt the agent loop entirely, rather
    /// than just failing the one call.
    pub fn is_stop(&self) -> bool {
        matches!(self, ApprovalDecision::Stop)
    }
}

#[cfg(test)]
#[path = "approval.test.rs"]
mod tests;
