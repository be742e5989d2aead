//! Token budget manager: tracks prompt/completion/total usage for a
//! thread and decides when compaction should trigger.

use lace_protocol::Event;
use lace_protocol::EventData;
use lace_protocol::TokenUsage;

/// A `(total, limit, pct_used, near_limit)` snapshot, as returned by
/// [`BudgetManager::status`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// Tokens accounted for since the last compaction (or since the
    /// thread began, if none has happened).
    pub total: u64,
    /// Configured ceiling.
    pub limit: u64,
    /// `total / limit`, in `[0.0, ...]` (may exceed 1.0 if a provider
    /// reports usage past the configured limit).
    pub pct_used: f64,
    /// Whether `pct_used >= warning_threshold`.
    pub near_limit: bool,
}

/// Tracks token usage for one thread and answers whether a prospective
/// request fits, or whether compaction should run first.
///
/// Compaction resets the counters rather than merely capping them: once
/// [`handle_compaction`](Self::handle_compaction) runs, prior usage is
/// replaced by the usage of the compaction's replacement events, and
/// accumulation continues from there. This is what keeps the budget's
/// view of "total so far" equivalent to the thread's observable history
/// after a compaction, rather than double-counting or losing usage.
#[derive(Debug, Clone, Copy)]
pub struct BudgetManager {
    limit: u64,
    warning_threshold: f64,
    reserve: u64,
    prompt: u64,
    completion: u64,
    total: u64,
}

impl BudgetManager {
    /// Build a manager with no usage recorded yet.
    pub fn new(limit: u64, warning_threshold: f64, reserve: u64) -> Self {
        Self {
            limit,
            warning_threshold,
            reserve,
            prompt: 0,
            completion: 0,
            total: 0,
        }
    }

    /// Reconstruct a manager's counters from a thread's raw event list,
    /// as when resuming after a cold start.
    ///
    /// Locates the most recent `COMPACTION` event and sums the usages of
    /// its replacement events plus every event after it; events before
    /// that point are ignored. Sums everything if no compaction exists.
    pub fn from_events(limit: u64, warning_threshold: f64, reserve: u64, events: &[Event]) -> Self {
        let mut manager = Self::new(limit, warning_threshold, reserve);

        let last_compaction_idx = events
            .iter()
            .rposition(|e| matches!(e.data, EventData::Compaction { .. }));

        match last_compaction_idx {
            Some(idx) => {
                if let EventData::Compaction { replacement, .. } = &events[idx].data {
                    for data in replacement {
                        if let Some(usage) = data.usage() {
                            manager.record(usage);
                        }
                    }
                }
                for event in &events[idx + 1..] {
                    if let Some(usage) = event.data.usage() {
                        manager.record(usage);
                    }
                }
            }
            None => {
                for event in events {
                    if let Some(usage) = event.data.usage() {
                        manager.record(usage);
                    }
                }
            }
        }

        manager
    }

    /// Add a usage record. Already non-negative by construction
    /// ([`TokenUsage::new`] clamps at the boundary), so this is a plain
    /// accumulation.
    pub fn record(&mut self, usage: TokenUsage) {
        self.prompt += usage.prompt;
        self.completion += usage.completion;
        self.total += usage.total;
    }

    /// Reset counters to the sum of usages in `replacement`, then resume
    /// accumulating from subsequent [`record`](Self::record) calls.
    pub fn handle_compaction(&mut self, replacement: &[EventData]) {
        self.prompt = 0;
        self.completion = 0;
        self.total = 0;
        for data in replacement {
            if let Some(usage) = data.usage() {
                self.record(usage);
            }
        }
    }

    /// Current status snapshot.
    pub fn status(&self) -> BudgetStatus {
        let pct_used = if self.limit == 0 {
            1.0
        } else {
            self.total as f64 / self.limit as f64
        };
        BudgetStatus {
            total: self.total,
            limit: self.limit,
            pct_used,
            near_limit: pct_used >= self.warning_threshold,
        }
    }

    /// Whether a request estimated to cost `estimate` additional tokens
    /// still fits within budget, after holding back `reserve`.
    pub fn can_request(&self, estimate: u64) -> bool {
        self.total + estimate + self.reserve <= self.limit
    }

    /// Tokens recorded against the prompt side so far.
    pub fn prompt_tokens(&self) -> u64 {
        self.prompt
    }

    /// Tokens recorded against the completion side so far.
    pub fn completion_tokens(&self) -> u64 {
        self.completion
    }
}

#[cfg(test)]
#[path = "budget.test.rs"]
mod tests;
