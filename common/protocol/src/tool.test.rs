use super::*;

#[test]
fn test_tool_output_constructors() {
    let ok = ToolOutput::text("done");
    assert!(!ok.is_error);
    assert!(matches!(ok.content.as_slice(), [ToolResultContent::Text(s)] if s == "done"));

    let err = ToolOutput::error("boom");
    assert!(err.is_error);

    let structured = ToolOutput::structured(serde_json::json!({"count": 3}));
    assert!(!structured.is_error);
    assert!(matches!(structured.content.as_slice(), [ToolResultContent::Structured(_)]));

    let uri = ToolOutput::uri("file:///tmp/out.txt");
    assert!(!uri.is_error);
    assert!(matches!(uri.content.as_slice(), [ToolResultContent::Uri(u)] if u == "file:///tmp/out.txt"));
}

#[test]
fn test_validation_result_is_valid() {
    assert!(ValidationResult::Valid.is_valid());
    assert!(!ValidationResult::error("bad input").is_valid());
}

#[test]
fn test_validation_error_display() {
    let with_path = ValidationError::with_path("must be a string", "$.command");
    assert_eq!(with_path.to_string(), "$.command: must be a string");

    let without_path = ValidationError::new("missing field");
    assert_eq!(without_path.to_string(), "missing field");
}

#[test]
fn test_risk_level_ordering() {
    assert!(RiskLevel::Low < RiskLevel::Medium);
    assert!(RiskLevel::Medium < RiskLevel::High);
}

#[test]
fn test_validation_result_serde_tag() {
    let json = serde_json::to_value(ValidationResult::Valid).unwrap();
    assert_eq!(json["status"], "valid");

    let invalid = ValidationResult::error("nope");
    let json = serde_json::to_value(&invalid).unwrap();
    assert_eq!(json["status"], "invalid");
}
