//! Token usage accounting attached to `AGENT_MESSAGE` and `COMPACTION` events.

use serde::Deserialize;
use serde::Serialize;

/// Prompt/completion/total token counts for a single provider exchange.
///
/// Always non-negative: providers occasionally report negative deltas when
/// correcting an earlier estimate, and those are clamped to zero at
/// construction rather than propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt (thread replay + tool inventory).
    pub prompt: u64,
    /// Tokens consumed by the completion.
    pub completion: u64,
    /// `prompt + completion`, kept as a field rather than computed so a
    /// provider's own total (which may include cache or reasoning tokens
    /// the two parts don't capture) can be recorded faithfully.
    pub total: u64,
}

impl TokenUsage {
    /// Build a usage record, clamping any negative-looking input to zero.
    ///
    /// Callers at the provider adapter boundary pass `i64`s straight from
    /// the wire; this is the one place that enforces non-negativity.
    pub fn new(prompt: i64, completion: i64, total: i64) -> Self {
        Self {
            prompt: prompt.max(0) as u64,
            completion: completion.max(0) as u64,
            total: total.max(0) as u64,
        }
    }

    /// Sum two usage records field-wise.
    pub fn add(self, other: TokenUsage) -> TokenUsage {
        TokenUsage {
            prompt: self.prompt + other.prompt,
            completion: self.completion + other.completion,
            total: self.total + other.total,
        }
    }
}

impl std::iter::Sum for TokenUsage {
    fn sum<I: Iterator<Item = TokenUsage>>(iter: I) -> Self {
        iter.fold(TokenUsage::default(), TokenUsage::add)
    }
}

#[cfg(test)]
#[path = "token_usage.test.rs"]
mod tests;
