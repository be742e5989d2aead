//! Path sandboxing: a write-class call whose target resolves outside the
//! configured allowed path prefixes is denied (or, when the session is
//! prompting anyway, folded into the approval round-trip) before it runs.

use std::path::Path;
use std::path::PathBuf;

use lace_config::SandboxConfig;
use serde_json::Value;

use crate::sensitive_files::is_locked_directory;
use crate::sensitive_files::is_outside_cwd;

const PATH_ARG_KEYS: &[&str] = &["path", "file_path", "target_path", "filename"];

/// Outcome of checking one call's target path against the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxOutcome {
    /// No violation, or nothing to check.
    Allow,
    /// The resolved target falls outside the sandbox.
    Violation { reason: String },
}

/// Resolves a call's path argument (if any) against the configured
/// allowed prefixes, following symlinks before comparing.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    config: SandboxConfig,
    cwd: PathBuf,
}

impl PathSandbox {
    pub fn new(config: SandboxConfig, cwd: PathBuf) -> Self {
        Self { config, cwd }
    }

    /// Check a call's target path, if it has one, against the sandbox.
    /// Only consulted for write-class (`destructive`) calls; read-only
    /// calls are never path-restricted here.
    pub fn check(&self, destructive: bool, arguments: &Value) -> SandboxOutcome {
        if !self.config.enabled || !destructive {
            return SandboxOutcome::Allow;
        }

        let Some(raw) = path_argument(arguments) else {
            return SandboxOutcome::Allow;
        };

        let resolved = self.resolve(Path::new(raw));

        if is_locked_directory(&resolved) {
            return SandboxOutcome::Violation {
                reason: format!("{} is in a locked directory", resolved.display()),
            };
        }

        if self.config.allowed_paths.is_empty() {
            return if is_outside_cwd(&resolved, &self.cwd) {
                SandboxOutcome::Violation {
                    reason: format!("{} is outside the working directory", resolved.display()),
                }
            } else {
                SandboxOutcome::Allow
            };
        }

        let within_allowed = self
            .config
            .allowed_paths
            .iter()
            .any(|allowed| resolved.starts_with(self.resolve(Path::new(allowed))));

        if within_allowed {
            SandboxOutcome::Allow
        } else {
            SandboxOutcome::Violation {
                reason: format!("{} is outside the sandbox's allowed paths", resolved.display()),
            }
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };
        canonicalize_best_effort(&joined)
    }
}

/// Resolves symlinks where possible. A target that does not exist yet
/// (the common case for a write) has no path to canonicalize directly,
/// so this walks up to the deepest existing ancestor, canonicalizes
/// that, and reattaches the remaining components — a symlinked parent
/// directory can't be used to point the non-existent tail outside the
/// sandbox.
fn canonicalize_best_effort(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let mut tail = Vec::new();
    let mut ancestor = path;
    loop {
        match ancestor.canonicalize() {
            Ok(canonical) => {
                return tail
                    .into_iter()
                    .rev()
                    .fold(canonical, |acc, component| acc.join(component));
            }
            Err(_) => {
                let Some(name) = ancestor.file_name() else {
                    return path.to_path_buf();
                };
                tail.push(name.to_owned());
                let Some(parent) = ancestor.parent() else {
                    return path.to_path_buf();
                };
                ancestor = parent;
            }
        }
    }
}

fn path_argument(arguments: &Value) -> Option<&str> {
    PATH_ARG_KEYS
        .iter()
        .find_map(|key| arguments.get(*key).and_then(|v| v.as_str()))
}

#[cfg(test)]
#[path = "sandbox.test.rs"]
mod tests;
