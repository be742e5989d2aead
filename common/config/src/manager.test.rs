use super::*;
use serial_test::serial;

#[test]
fn test_from_config_roundtrip() {
    let config = Config {
        delegation: crate::types::DelegationConfig { max_depth: 9 },
        ..Default::default()
    };
    let manager = ConfigManager::from_config(config.clone());
    assert_eq!(manager.current(), config);
}

#[test]
#[serial]
fn test_overrides_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(loader::CONFIG_FILE),
        r#"{"retry": {"max_attempts": 9}}"#,
    )
    .unwrap();

    let overrides = ConfigOverrides {
        delegation: Some(crate::types::DelegationConfig { max_depth: 1 }),
        ..Default::default()
    };
    // SAFETY: no other test in this binary reads LACE_HOME concurrently
    // with this one holding it set.
    unsafe { std::env::set_var(loader::LACE_HOME_ENV, dir.path()) };
    let manager = ConfigManager::load(overrides).unwrap();
    assert_eq!(manager.current().delegation.max_depth, 1);
    assert_eq!(manager.current().retry.max_attempts, 9);

    manager.reload().unwrap();
    assert_eq!(manager.current().delegation.max_depth, 1);
    unsafe { std::env::remove_var(loader::LACE_HOME_ENV) };
}
