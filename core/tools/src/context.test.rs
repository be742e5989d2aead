use std::path::PathBuf;

use super::*;

#[test]
fn test_new_context_not_cancelled() {
    let ctx = ToolContext::new("call-1", "session-1");
    assert!(!ctx.is_cancelled());
}

#[test]
fn test_resolve_relative_path() {
    let ctx = ToolContext::with_cwd("call-1", "session-1", "/home/user/project");
    assert_eq!(
        ctx.resolve_path("src/main.rs"),
        PathBuf::from("/home/user/project/src/main.rs")
    );
}

#[test]
fn test_resolve_absolute_path_unchanged() {
    let ctx = ToolContext::with_cwd("call-1", "session-1", "/home/user/project");
    assert_eq!(ctx.resolve_path("/etc/passwd"), PathBuf::from("/etc/passwd"));
}

#[test]
fn test_cancel_token_propagates() {
    let token = CancellationToken::new();
    let ctx = ToolContext::new("call-1", "session-1").with_cancel_token(token.clone());
    token.cancel();
    assert!(ctx.is_cancelled());
}

#[test]
fn test_file_tracker_records_read_and_modified() {
    let mut tracker = FileTracker::default();
    let path = PathBuf::from("/tmp/a.txt");
    assert!(!tracker.was_read(&path));
    tracker.record_read(&path);
    assert!(tracker.was_read(&path));
    assert!(!tracker.was_modified(&path));
    tracker.record_modified(&path);
    assert!(tracker.was_modified(&path));
}
