use serde_json::json;

use super::*;

#[test]
fn test_shell_destructive_command_is_high() {
    let args = json!({"command": "rm -rf /"});
    assert_eq!(classify_risk("bash", &args), RiskLevel::High);
}

#[test]
fn test_shell_benign_command_is_medium() {
    let args = json!({"command": "ls -la"});
    assert_eq!(classify_risk("bash", &args), RiskLevel::Medium);
}

#[test]
fn test_file_write_sensitive_path_is_high() {
    let args = json!({"path": ".env"});
    assert_eq!(classify_risk("file_write", &args), RiskLevel::High);
}

#[test]
fn test_file_write_normal_path_is_medium() {
    let args = json!({"path": "src/main.rs"});
    assert_eq!(classify_risk("file_edit", &args), RiskLevel::Medium);
}

#[test]
fn test_file_read_is_always_low() {
    let args = json!({"path": ".env"});
    assert_eq!(classify_risk("file_read", &args), RiskLevel::Low);
}

#[test]
fn test_code_eval_with_dynamic_exec_is_high() {
    let args = json!({"code": "subprocess.run(['ls'])"});
    assert_eq!(classify_risk("python_eval", &args), RiskLevel::High);
}

#[test]
fn test_code_eval_plain_is_low() {
    let args = json!({"code": "print(1 + 1)"});
    assert_eq!(classify_risk("python_eval", &args), RiskLevel::Low);
}

#[test]
fn test_unknown_tool_is_low() {
    let args = json!({});
    assert_eq!(classify_risk("frobnicate", &args), RiskLevel::Low);
}
