use super::*;

#[test]
fn test_partial_file_parses() {
    let json = r#"{"tools": {"auto_approve": ["file_read"]}}"#;
    let parsed: FileConfig = serde_json::from_str(json).unwrap();
    assert_eq!(
        parsed.tools.unwrap().auto_approve,
        Some(vec!["file_read".to_string()])
    );
    assert!(parsed.token_budget.is_none());
}

#[test]
fn test_empty_file_parses() {
    let parsed: FileConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, FileConfig::default());
}

#[test]
fn test_omits_absent_fields_on_serialize() {
    let config = FileConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(json, "{}");
}
