use super::*;

#[test]
fn test_missing_file_yields_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_file_config(dir.path()).unwrap();
    assert_eq!(config, FileConfig::default());
}

#[test]
fn test_parses_present_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        r#"{"delegation": {"max_depth": 5}}"#,
    )
    .unwrap();
    let config = load_file_config(dir.path()).unwrap();
    assert_eq!(config.delegation.unwrap().max_depth, Some(5));
}

#[test]
fn test_invalid_json_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
    let result = load_file_config(dir.path());
    assert!(result.is_err());
}
