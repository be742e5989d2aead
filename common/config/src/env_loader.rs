//! Environment variable overrides, all under the `LACE_` prefix.

use std::env;

use tracing::debug;

pub const ENV_TOKEN_BUDGET_LIMIT: &str = "LACE_TOKEN_BUDGET_LIMIT";
pub const ENV_TOKEN_BUDGET_WARNING_THRESHOLD: &str = "LACE_TOKEN_BUDGET_WARNING_THRESHOLD";
pub const ENV_TOKEN_BUDGET_RESERVE: &str = "LACE_TOKEN_BUDGET_RESERVE";

pub const ENV_TOOLS_AUTO_APPROVE: &str = "LACE_TOOLS_AUTO_APPROVE";
pub const ENV_TOOLS_DENY_LIST: &str = "LACE_TOOLS_DENY_LIST";
pub const ENV_TOOLS_TIMEOUT_MS: &str = "LACE_TOOLS_TIMEOUT_MS";

pub const ENV_SANDBOX_ENABLED: &str = "LACE_SANDBOX_ENABLED";
pub const ENV_SANDBOX_ALLOWED_PATHS: &str = "LACE_SANDBOX_ALLOWED_PATHS";

pub const ENV_DELEGATION_MAX_DEPTH: &str = "LACE_DELEGATION_MAX_DEPTH";

pub const ENV_RETRY_MAX_ATTEMPTS: &str = "LACE_RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_BASE_BACKOFF_MS: &str = "LACE_RETRY_BASE_BACKOFF_MS";

/// Reads `LACE_*` environment variables, logging and ignoring any that
/// fail to parse rather than failing configuration load entirely.
#[derive(Debug, Default)]
pub struct EnvLoader;

impl EnvLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    fn get_u64(&self, name: &str) -> Option<u64> {
        self.get_parsed(name)
    }

    fn get_u32(&self, name: &str) -> Option<u32> {
        self.get_parsed(name)
    }

    fn get_f64(&self, name: &str) -> Option<f64> {
        self.get_parsed(name)
    }

    fn get_bool(&self, name: &str) -> Option<bool> {
        self.get_parsed(name)
    }

    fn get_parsed<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        match env::var(name) {
            Ok(raw) => match raw.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    debug!(name, raw, "ignoring env override: failed to parse");
                    None
                }
            },
            Err(_) => None,
        }
    }

    fn get_list(&self, name: &str) -> Option<Vec<String>> {
        env::var(name).ok().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    /// Read all recognized `LACE_*` variables into a sparse override set.
    pub fn load(&self) -> EnvOverrides {
        EnvOverrides {
            token_budget_limit: self.get_u64(ENV_TOKEN_BUDGET_LIMIT),
            token_budget_warning_threshold: self.get_f64(ENV_TOKEN_BUDGET_WARNING_THRESHOLD),
            token_budget_reserve: self.get_u64(ENV_TOKEN_BUDGET_RESERVE),
            tools_auto_approve: self.get_list(ENV_TOOLS_AUTO_APPROVE),
            tools_deny_list: self.get_list(ENV_TOOLS_DENY_LIST),
            tools_timeout_ms: self.get_u64(ENV_TOOLS_TIMEOUT_MS),
            sandbox_enabled: self.get_bool(ENV_SANDBOX_ENABLED),
            sandbox_allowed_paths: self.get_list(ENV_SANDBOX_ALLOWED_PATHS),
            delegation_max_depth: self.get_u32(ENV_DELEGATION_MAX_DEPTH),
            retry_max_attempts: self.get_u32(ENV_RETRY_MAX_ATTEMPTS),
            retry_base_backoff_ms: self.get_u64(ENV_RETRY_BASE_BACKOFF_MS),
        }
    }
}

/// Sparse set of values read from the environment; `None` means "not set",
/// not "set to the default".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnvOverrides {
    pub token_budget_limit: Option<u64>,
    pub token_budget_warning_threshold: Option<f64>,
    pub token_budget_reserve: Option<u64>,
    pub tools_auto_approve: Option<Vec<String>>,
    pub tools_deny_list: Option<Vec<String>>,
    pub tools_timeout_ms: Option<u64>,
    pub sandbox_enabled: Option<bool>,
    pub sandbox_allowed_paths: Option<Vec<String>>,
    pub delegation_max_depth: Option<u32>,
    pub retry_max_attempts: Option<u32>,
    pub retry_base_backoff_ms: Option<u64>,
}

#[cfg(test)]
#[path = "env_loader.test.rs"]
mod tests;
