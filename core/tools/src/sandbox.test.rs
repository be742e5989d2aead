use serde_json::json;
use tempfile::tempdir;

use super::*;

fn config(enabled: bool, allowed_paths: Vec<String>) -> SandboxConfig {
    SandboxConfig {
        enabled,
        allowed_paths,
    }
}

#[test]
fn test_disabled_sandbox_allows_everything() {
    let dir = tempdir().unwrap();
    let sandbox = PathSandbox::new(config(false, vec![]), dir.path().to_path_buf());

    let outcome = sandbox.check(true, &json!({"path": "/etc/passwd"}));

    assert_eq!(outcome, SandboxOutcome::Allow);
}

#[test]
fn test_readonly_call_is_never_checked() {
    let dir = tempdir().unwrap();
    let sandbox = PathSandbox::new(config(true, vec![]), dir.path().to_path_buf());

    let outcome = sandbox.check(false, &json!({"path": "/etc/passwd"}));

    assert_eq!(outcome, SandboxOutcome::Allow);
}

#[test]
fn test_call_with_no_path_argument_is_allowed() {
    let dir = tempdir().unwrap();
    let sandbox = PathSandbox::new(config(true, vec![]), dir.path().to_path_buf());

    let outcome = sandbox.check(true, &json!({"command": "ls"}));

    assert_eq!(outcome, SandboxOutcome::Allow);
}

#[test]
fn test_write_inside_cwd_is_allowed_with_no_allowed_paths_configured() {
    let dir = tempdir().unwrap();
    let sandbox = PathSandbox::new(config(true, vec![]), dir.path().to_path_buf());

    let outcome = sandbox.check(true, &json!({"path": "notes.txt"}));

    assert_eq!(outcome, SandboxOutcome::Allow);
}

#[test]
fn test_write_outside_cwd_is_denied_with_no_allowed_paths_configured() {
    let dir = tempdir().unwrap();
    let sandbox = PathSandbox::new(config(true, vec![]), dir.path().to_path_buf());

    let outcome = sandbox.check(true, &json!({"path": "/etc/passwd"}));

    assert!(matches!(outcome, SandboxOutcome::Violation { .. }));
}

#[test]
fn test_write_within_an_allowed_prefix_is_allowed() {
    let dir = tempdir().unwrap();
    let allowed = dir.path().join("workspace");
    std::fs::create_dir(&allowed).unwrap();
    let sandbox = PathSandbox::new(
        config(true, vec![allowed.to_string_lossy().into_owned()]),
        dir.path().to_path_buf(),
    );

    let outcome = sandbox.check(
        true,
        &json!({"path": allowed.join("notes.txt").to_string_lossy()}),
    );

    assert_eq!(outcome, SandboxOutcome::Allow);
}

#[test]
fn test_write_outside_every_allowed_prefix_is_a_violation() {
    let dir = tempdir().unwrap();
    let allowed = dir.path().join("workspace");
    std::fs::create_dir(&allowed).unwrap();
    let outside = dir.path().join("other");
    std::fs::create_dir(&outside).unwrap();
    let sandbox = PathSandbox::new(
        config(true, vec![allowed.to_string_lossy().into_owned()]),
        dir.path().to_path_buf(),
    );

    let outcome = sandbox.check(
        true,
        &json!({"path": outside.join("notes.txt").to_string_lossy()}),
    );

    assert!(matches!(outcome, SandboxOutcome::Violation { .. }));
}

#[test]
fn test_symlinked_allowed_path_resolves_before_comparison() {
    let dir = tempdir().unwrap();
    let real_outside = dir.path().join("real_outside");
    std::fs::create_dir(&real_outside).unwrap();
    let allowed = dir.path().join("workspace");
    std::fs::create_dir(&allowed).unwrap();
    let link = allowed.join("escape");
    #[cfg(unix)]
    std::os::unix::fs::symlink(&real_outside, &link).unwrap();

    let sandbox = PathSandbox::new(
        config(true, vec![allowed.to_string_lossy().into_owned()]),
        dir.path().to_path_buf(),
    );

    #[cfg(unix)]
    {
        let outcome = sandbox.check(
            true,
            &json!({"path": link.join("notes.txt").to_string_lossy()}),
        );
        assert!(matches!(outcome, SandboxOutcome::Violation { .. }));
    }
}

#[test]
fn test_locked_directory_is_a_violation_even_inside_an_allowed_path() {
    let dir = tempdir().unwrap();
    let lace_dir = dir.path().join(".lace").join("commands");
    std::fs::create_dir_all(&lace_dir).unwrap();
    let sandbox = PathSandbox::new(
        config(true, vec![dir.path().to_string_lossy().into_owned()]),
        dir.path().to_path_buf(),
    );

    let outcome = sandbox.check(
        true,
        &json!({"path": lace_dir.join("custom.md").to_string_lossy()}),
    );

    assert!(matches!(outcome, SandboxOutcome::Violation { .. }));
}
