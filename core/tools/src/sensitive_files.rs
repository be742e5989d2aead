//! Sensitive file detection for permission checks.
//!
//! Identifies files that require elevated permission due to containing
//! credentials, secrets, or critical configuration.

use std::path::Path;

/// Sensitive file path patterns.
const SENSITIVE_FILE_PATTERNS: &[&str] = &[
    // Credentials and keys
    ".env",
    "*.pem",
    "*.key",
    "credentials.json",
    // Shell configuration
    ".bashrc",
    ".zshrc",
    ".bash_profile",
    ".zprofile",
    ".profile",
    // Git configuration
    ".gitconfig",
    ".git-credentials",
    ".gitmodules",
    // SSH
    ".ssh/config",
    ".ssh/authorized_keys",
    // Tool configuration
    ".mcp.json",
    ".lace/settings.json",
    ".npmrc",
    ".pypirc",
    ".ripgreprc",
    // CI/CD
    ".github/workflows/*.yml",
];

/// Locked directories that should not be written to.
const LOCKED_DIRECTORIES: &[&str] = &[".lace/commands/", ".lace/agents/", ".lace/skills/"];

/// Sensitive directories that require approval for writes.
const SENSITIVE_DIRECTORIES: &[&str] = &[".git/", ".vscode/", ".idea/"];

/// Check if a file path matches any sensitive file pattern.
pub fn is_sensitive_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();

    for pattern in SENSITIVE_FILE_PATTERNS {
        if matches_pattern(pattern, &path_str, &filename) {
            return true;
        }
    }

    if filename.starts_with(".env.") {
        return true;
    }

    if filename.starts_with("service-account") && filename.ends_with(".json") {
        return true;
    }

    if path_str.contains(".ssh/id_") {
        return true;
    }

    false
}

/// Check if a path is within a locked directory.
pub fn is_locked_directory(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    LOCKED_DIRECTORIES.iter().any(|dir| path_str.contains(dir))
}

/// Check if a path is within a sensitive directory (requires approval for writes).
pub fn is_sensitive_directory(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    SENSITIVE_DIRECTORIES
        .iter()
        .any(|dir| path_str.contains(dir))
}

/// Check if a path is outside the given working directory.
pub fn is_outside_cwd(path: &Path, cwd: &Path) -> bool {
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    !abs_path.starts_with(cwd)
}

/// Simple pattern matching for sensitive file detection.
fn matches_pattern(pattern: &str, full_path: &str, filename: &str) -> bool {
    if pattern.contains('/') {
        if pattern.contains('*') {
            let parts: Vec<&str> = pattern.split('*').collect();
            if parts.len() == 2 {
                return full_path.contains(parts[0]) && full_path.ends_with(parts[1]);
            }
        }
        return full_path.ends_with(pattern) || full_path.contains(&format!("/{pattern}"));
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return filename.ends_with(suffix);
    }

    filename == pattern
}

#[cfg(test)]
#[path = "sensitive_files.test.rs"]
mod tests;
