use super::*;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.token_budget.limit, 128_000);
    assert_eq!(config.token_budget.warning_threshold, 0.85);
    assert_eq!(config.tools.timeout_ms, 30_000);
    assert!(config.sandbox.enabled);
    assert_eq!(config.delegation.max_depth, 3);
    assert_eq!(config.retry.max_attempts, 3);
}

#[test]
fn test_serde_roundtrip() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
