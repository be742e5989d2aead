//! Token budget tracking for agent threads.
//!
//! [`BudgetManager`] accumulates [`lace_protocol::TokenUsage`] from
//! completed turns and answers whether the next request fits, or whether
//! compaction should run first. [`estimate_tokens`] is the pure fallback
//! used when a provider response doesn't carry usage.

pub mod budget;
pub mod estimator;

pub use budget::BudgetManager;
pub use budget::BudgetStatus;
pub use estimator::DEFAULT_CHARS_PER_TOKEN;
pub use estimator::estimate_tokens;
pub use estimator::estimate_tokens_with_ratio;
