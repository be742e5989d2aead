//! Approval arbitration: decide whether a call runs immediately, is
//! denied outright, or needs a round-trip to the session's approval
//! callback.

use lace_protocol::RiskLevel;

/// The result of arbitrating one call, before any session approval
/// round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbitrationOutcome {
    /// Run the call without prompting.
    Allow,
    /// Refuse outright; the deny list takes precedence over everything.
    Deny,
    /// Neither allow nor deny list matched and the call isn't low-risk
    /// enough to auto-allow: ask the session's approval callback.
    NeedsApproval,
}

/// Evaluates a call's auto-approve/deny lists against its name, falling
/// back to risk-based auto-allow for read-only, low-risk calls.
///
/// Patterns support an exact match or a trailing `*` wildcard (e.g.
/// `"file_read*"` matches `"file_read"` and `"file_read_many"`); deny
/// entries are checked before allow entries so a name on both lists is
/// denied.
#[derive(Debug, Clone, Default)]
pub struct Arbitrator {
    auto_approve: Vec<String>,
    deny_list: Vec<String>,
}

impl Arbitrator {
    /// Build an arbitrator from configured name patterns.
    pub fn new(auto_approve: Vec<String>, deny_list: Vec<String>) -> Self {
        Self {
            auto_approve,
            deny_list,
        }
    }

    /// Decide the outcome for a call, given whether the tool declares
    /// itself destructive and its classified risk.
    pub fn arbitrate(&self, tool_name: &str, destructive: bool, risk: RiskLevel) -> ArbitrationOutcome {
        if Self::matches_any(&self.deny_list, tool_name) {
            return ArbitrationOutcome::Deny;
        }
        if Self::matches_any(&self.auto_approve, tool_name) {
            return ArbitrationOutcome::Allow;
        }
        if !destructive && risk == RiskLevel::Low {
            return ArbitrationOutcome::Allow;
        }
        ArbitrationOutcome::NeedsApproval
    }

    fn matches_any(patterns: &[String], tool_name: &str) -> bool {
        patterns.iter().any(|pattern| Self::matches(pattern, tool_name))
    }

    fn matches(pattern: &str, tool_name: &str) -> bool {
        if pattern == "*" {
            return true;
        }
        match pattern.strip_suffix('*') {
            Some(prefix) => tool_name.starts_with(prefix),
            None => pattern == tool_name,
        }
    }
}

#[cfg(test)]
#[path = "arbitration.test.rs"]
mod tests;
