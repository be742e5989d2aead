//! Runtime configuration: the merged view `ConfigManager` hands to the
//! rest of the workspace, already resolved from overrides, environment,
//! and the config file.

use serde::Deserialize;
use serde::Serialize;

/// Token budget limits (`core/context`'s `BudgetManager`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenBudgetConfig {
    /// Total tokens (prompt + completion) considered in-budget.
    pub limit: u64,
    /// Fraction of `limit` at which `canRequest`/`status` report `nearLimit`.
    pub warning_threshold: f64,
    /// Tokens held back from `limit` for the next request's completion.
    pub reserve: u64,
}

impl Default for TokenBudgetConfig {
    fn default() -> Self {
        Self {
            limit: 128_000,
            warning_threshold: 0.85,
            reserve: 4_096,
        }
    }
}

/// Tool execution policy (`core/tools`'s permission evaluator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Tool names auto-approved without an approval round-trip.
    pub auto_approve: Vec<String>,
    /// Tool names always denied, regardless of `auto_approve`.
    pub deny_list: Vec<String>,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            auto_approve: Vec::new(),
            deny_list: Vec::new(),
            timeout_ms: 30_000,
        }
    }
}

/// Filesystem sandbox policy for path-taking tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Whether sandboxing is enforced at all.
    pub enabled: bool,
    /// Path prefixes tools are permitted to touch when `enabled`.
    pub allowed_paths: Vec<String>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_paths: Vec::new(),
        }
    }
}

/// Delegation (sub-agent spawning) limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationConfig {
    /// Maximum nesting depth a chain of `delegate` calls may reach.
    pub max_depth: u32,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// Retry policy for transient provider failures within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts per turn.
    pub max_attempts: u32,
    /// Base backoff before the first retry; doubles each attempt.
    pub base_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 500,
        }
    }
}

/// The fully resolved configuration snapshot handed to the rest of the
/// workspace by [`crate::manager::ConfigManager`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Token budget section.
    pub token_budget: TokenBudgetConfig,
    /// Tool execution section.
    pub tools: ToolsConfig,
    /// Sandbox section.
    pub sandbox: SandboxConfig,
    /// Delegation section.
    pub delegation: DelegationConfig,
    /// Retry section.
    pub retry: RetryConfig,
}

#[cfg(test)]
#[path = "types.test.rs"]
mod tests;
