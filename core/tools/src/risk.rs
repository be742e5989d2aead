//! Design-level risk classification for a tool call.
//!
//! Not a security boundary: a tool body must be safe regardless of how it
//! is classified here. This only decides whether the executor treats a
//! call as low enough risk to auto-allow or whether it needs approval.

use lace_protocol::RiskLevel;
use serde_json::Value;

use crate::sensitive_files::is_sensitive_directory;
use crate::sensitive_files::is_sensitive_file;

const DESTRUCTIVE_SHELL_TOKENS: &[&str] = &["rm -rf", "| sh", "| bash", "sudo ", "chmod 777"];
const CODE_EVAL_TOKENS: &[&str] = &["eval(", "exec(", "import(", "require(", "subprocess"];
const PATH_ARG_KEYS: &[&str] = &["path", "file_path", "target_path", "filename"];

/// Classify the risk of a call, given the tool's name and its arguments.
///
/// Tool names are matched by substring against a small set of known
/// categories (`bash`/`shell`, `write`/`edit`, `read`, `eval`); a name
/// outside all of these is classified `Low`, same as an unrecognized tool
/// generally is — the annotation-driven arbitration in
/// [`crate::arbitration`] is what actually gates execution, not this
/// heuristic alone.
pub fn classify_risk(tool_name: &str, arguments: &Value) -> RiskLevel {
    let name = tool_name.to_ascii_lowercase();

    if name.contains("bash") || name.contains("shell") {
        return classify_shell_risk(arguments);
    }

    if name.contains("write") || name.contains("edit") {
        return classify_file_write_risk(arguments);
    }

    if name.contains("read") {
        return RiskLevel::Low;
    }

    if name.contains("eval") || name.contains("exec") {
        return classify_code_eval_risk(arguments);
    }

    RiskLevel::Low
}

fn command_argument(arguments: &Value) -> Option<&str> {
    arguments
        .get("command")
        .or_else(|| arguments.get("script"))
        .and_then(|v| v.as_str())
}

fn classify_shell_risk(arguments: &Value) -> RiskLevel {
    match command_argument(arguments) {
        Some(command) => {
            let lower = command.to_ascii_lowercase();
            if DESTRUCTIVE_SHELL_TOKENS
                .iter()
                .any(|token| lower.contains(token))
            {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            }
        }
        None => RiskLevel::Medium,
    }
}

fn path_argument(arguments: &Value) -> Option<&str> {
    PATH_ARG_KEYS
        .iter()
        .find_map(|key| arguments.get(*key).and_then(|v| v.as_str()))
}

fn classify_file_write_risk(arguments: &Value) -> RiskLevel {
    match path_argument(arguments) {
        Some(path) => {
            let path = std::path::Path::new(path);
            if is_sensitive_file(path) || is_sensitive_directory(path) {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            }
        }
        None => RiskLevel::Medium,
    }
}

fn classify_code_eval_risk(arguments: &Value) -> RiskLevel {
    let source = arguments
        .get("code")
        .or_else(|| arguments.get("source"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if CODE_EVAL_TOKENS.iter().any(|token| source.contains(token)) {
        RiskLevel::High
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
#[path = "risk.test.rs"]
mod tests;
