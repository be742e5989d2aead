use super::*;
use serial_test::serial;

fn clear_all() {
    for name in [
        ENV_TOKEN_BUDGET_LIMIT,
        ENV_TOKEN_BUDGET_WARNING_THRESHOLD,
        ENV_TOKEN_BUDGET_RESERVE,
        ENV_TOOLS_AUTO_APPROVE,
        ENV_TOOLS_DENY_LIST,
        ENV_TOOLS_TIMEOUT_MS,
        ENV_SANDBOX_ENABLED,
        ENV_SANDBOX_ALLOWED_PATHS,
        ENV_DELEGATION_MAX_DEPTH,
        ENV_RETRY_MAX_ATTEMPTS,
        ENV_RETRY_BASE_BACKOFF_MS,
    ] {
        // SAFETY: tests run serially (`#[serial]`); no other thread reads
        // these vars concurrently.
        unsafe { env::remove_var(name) };
    }
}

#[test]
#[serial]
fn test_empty_env_yields_no_overrides() {
    clear_all();
    let overrides = EnvLoader::new().load();
    assert_eq!(overrides, EnvOverrides::default());
}

#[test]
#[serial]
fn test_parses_set_values() {
    clear_all();
    unsafe {
        env::set_var(ENV_TOKEN_BUDGET_LIMIT, "64000");
        env::set_var(ENV_TOKEN_BUDGET_WARNING_THRESHOLD, "0.9");
        env::set_var(ENV_SANDBOX_ENABLED, "false");
        env::set_var(ENV_TOOLS_AUTO_APPROVE, "file_read, file_list");
    }
    let overrides = EnvLoader::new().load();
    assert_eq!(overrides.token_budget_limit, Some(64_000));
    assert_eq!(overrides.token_budget_warning_threshold, Some(0.9));
    assert_eq!(overrides.sandbox_enabled, Some(false));
    assert_eq!(
        overrides.tools_auto_approve,
        Some(vec!["file_read".to_string(), "file_list".to_string()])
    );
    clear_all();
}

#[test]
#[serial]
fn test_unparseable_value_is_ignored_not_fatal() {
    clear_all();
    unsafe {
        env::set_var(ENV_TOKEN_BUDGET_LIMIT, "not-a-number");
    }
    let overrides = EnvLoader::new().load();
    assert_eq!(overrides.token_budget_limit, None);
    clear_all();
}
