use super::*;

#[test]
fn test_defaults_when_nothing_set() {
    let config = build_config(
        &ConfigOverrides::default(),
        &EnvOverrides::default(),
        &FileConfig::default(),
    );
    assert_eq!(config, Config::default());
}

#[test]
fn test_file_overrides_default() {
    let file = FileConfig {
        retry: Some(crate::file_config::RetryFileConfig {
            max_attempts: Some(5),
            base_backoff_ms: None,
        }),
        ..Default::default()
    };
    let config = build_config(&ConfigOverrides::default(), &EnvOverrides::default(), &file);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_backoff_ms, RetryConfig::default().base_backoff_ms);
}

#[test]
fn test_env_overrides_file() {
    let file = FileConfig {
        retry: Some(crate::file_config::RetryFileConfig {
            max_attempts: Some(5),
            base_backoff_ms: None,
        }),
        ..Default::default()
    };
    let env = EnvOverrides {
        retry_max_attempts: Some(7),
        ..Default::default()
    };
    let config = build_config(&ConfigOverrides::default(), &env, &file);
    assert_eq!(config.retry.max_attempts, 7);
}

#[test]
fn test_override_beats_everything() {
    let file = FileConfig {
        retry: Some(crate::file_config::RetryFileConfig {
            max_attempts: Some(5),
            base_backoff_ms: None,
        }),
        ..Default::default()
    };
    let env = EnvOverrides {
        retry_max_attempts: Some(7),
        ..Default::default()
    };
    let overrides = ConfigOverrides {
        retry: Some(RetryConfig {
            max_attempts: 1,
            base_backoff_ms: 10,
        }),
        ..Default::default()
    };
    let config = build_config(&overrides, &env, &file);
    assert_eq!(config.retry.max_attempts, 1);
    assert_eq!(config.retry.base_backoff_ms, 10);
}
