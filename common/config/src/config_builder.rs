//! Merges a [`Config`] from four layers, highest priority first:
//! in-memory overrides, environment variables, the config file, built-in
//! defaults.

use crate::env_loader::EnvOverrides;
use crate::file_config::FileConfig;
use crate::types::Config;
use crate::types::DelegationConfig;
use crate::types::RetryConfig;
use crate::types::SandboxConfig;
use crate::types::TokenBudgetConfig;
use crate::types::ToolsConfig;

/// In-memory overrides, e.g. from CLI flags or a test harness. Takes
/// precedence over everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub token_budget: Option<TokenBudgetConfig>,
    pub tools: Option<ToolsConfig>,
    pub sandbox: Option<SandboxConfig>,
    pub delegation: Option<DelegationConfig>,
    pub retry: Option<RetryConfig>,
}

/// One mergeable section of [`Config`].
///
/// Each section resolves independently: an override replaces the section
/// wholesale, otherwise fields are taken from the environment, then the
/// file, then the built-in [`Default`].
trait ConfigSection: Default {
    fn from_override(overrides: &ConfigOverrides) -> Option<Self>;
    fn merge_env(&mut self, env: &EnvOverrides);
    fn merge_file(&mut self, file: &FileConfig);
}

impl ConfigSection for TokenBudgetConfig {
    fn from_override(overrides: &ConfigOverrides) -> Option<Self> {
        overrides.token_budget
    }

    fn merge_env(&mut self, env: &EnvOverrides) {
        if let Some(limit) = env.token_budget_limit {
            self.limit = limit;
        }
        if let Some(threshold) = env.token_budget_warning_threshold {
            self.warning_threshold = threshold;
        }
        if let Some(reserve) = env.token_budget_reserve {
            self.reserve = reserve;
        }
    }

    fn merge_file(&mut self, file: &FileConfig) {
        let default = Self::default();
        if let Some(section) = &file.token_budget {
            if self.limit == default.limit {
                if let Some(limit) = section.limit {
                    self.limit = limit;
                }
            }
            if self.warning_threshold == default.warning_threshold {
                if let Some(threshold) = section.warning_threshold {
                    self.warning_threshold = threshold;
                }
            }
            if self.reserve == default.reserve {
                if let Some(reserve) = section.reserve {
                    self.reserve = reserve;
                }
            }
        }
    }
}

impl ConfigSection for ToolsConfig {
    fn from_override(overrides: &ConfigOverrides) -> Option<Self> {
        overrides.tools.clone()
    }

    fn merge_env(&mut self, env: &EnvOverrides) {
        if let Some(list) = &env.tools_auto_approve {
            self.auto_approve = list.clone();
        }
        if let Some(list) = &env.tools_deny_list {
            self.deny_list = list.clone();
        }
        if let Some(timeout) = env.tools_timeout_ms {
            self.timeout_ms = timeout;
        }
    }

    fn merge_file(&mut self, file: &FileConfig) {
        let default = Self::default();
        if let Some(section) = &file.tools {
            if self.auto_approve == default.auto_approve {
                if let Some(list) = &section.auto_approve {
                    self.auto_approve = list.clone();
                }
            }
            if self.deny_list == default.deny_list {
                if let Some(list) = &section.deny_list {
                    self.deny_list = list.clone();
                }
            }
            if self.timeout_ms == default.timeout_ms {
                if let Some(timeout) = section.timeout_ms {
                    self.timeout_ms = timeout;
                }
            }
        }
    }
}

impl ConfigSection for SandboxConfig {
    fn from_override(overrides: &ConfigOverrides) -> Option<Self> {
        overrides.sandbox.clone()
    }

    fn merge_env(&mut self, env: &EnvOverrides) {
        if let Some(enabled) = env.sandbox_enabled {
            self.enabled = enabled;
        }
        if let Some(paths) = &env.sandbox_allowed_paths {
            self.allowed_paths = paths.clone();
        }
    }

    fn merge_file(&mut self, file: &FileConfig) {
        let default = Self::default();
        if let Some(section) = &file.sandbox {
            if self.enabled == default.enabled {
                if let Some(enabled) = section.enabled {
                    self.enabled = enabled;
                }
            }
            if self.allowed_paths == default.allowed_paths {
                if let Some(paths) = &section.allowed_paths {
                    self.allowed_paths = paths.clone();
                }
            }
        }
    }
}

impl ConfigSection for DelegationConfig {
    fn from_override(overrides: &ConfigOverrides) -> Option<Self> {
        overrides.delegation
    }

    fn merge_env(&mut self, env: &EnvOverrides) {
        if let Some(depth) = env.delegation_max_depth {
            self.max_depth = depth;
        }
    }

    fn merge_file(&mut self, file: &FileConfig) {
        let default = Self::default();
        if let Some(section) = &file.delegation {
            if self.max_depth == default.max_depth {
                if let Some(depth) = section.max_depth {
                    self.max_depth = depth;
                }
            }
        }
    }
}

impl ConfigSection for RetryConfig {
    fn from_override(overrides: &ConfigOverrides) -> Option<Self> {
        overrides.retry
    }

    fn merge_env(&mut self, env: &EnvOverrides) {
        if let Some(attempts) = env.retry_max_attempts {
            self.max_attempts = attempts;
        }
        if let Some(backoff) = env.retry_base_backoff_ms {
            self.base_backoff_ms = backoff;
        }
    }

    fn merge_file(&mut self, file: &FileConfig) {
        let default = Self::default();
        if let Some(section) = &file.retry {
            if self.max_attempts == default.max_attempts {
                if let Some(attempts) = section.max_attempts {
                    self.max_attempts = attempts;
                }
            }
            if self.base_backoff_ms == default.base_backoff_ms {
                if let Some(backoff) = section.base_backoff_ms {
                    self.base_backoff_ms = backoff;
                }
            }
        }
    }
}

fn merge_section<T: ConfigSection>(
    overrides: &ConfigOverrides,
    env: &EnvOverrides,
    file: &FileConfig,
) -> T {
    T::from_override(overrides).unwrap_or_else(|| {
        let mut section = T::default();
        section.merge_env(env);
        section.merge_file(file);
        section
    })
}

/// Resolve a [`Config`] from the four layers in priority order.
pub fn build_config(overrides: &ConfigOverrides, env: &EnvOverrides, file: &FileConfig) -> Config {
    Config {
        token_budget: merge_section(overrides, env, file),
        tools: merge_section(overrides, env, file),
        sandbox: merge_section(overrides, env, file),
        delegation: merge_section(overrides, env, file),
        retry: merge_section(overrides, env, file),
    }
}

#[cfg(test)]
#[path = "config_builder.test.rs"]
mod tests;
