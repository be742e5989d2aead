use lace_error::StatusCode;

use super::*;

#[test]
fn test_busy_is_invalid_request() {
    let err = loop_error::BusySnafu { state: "thinking" }.build();
    assert_eq!(err.status_code(), StatusCode::InvalidRequest);
    assert!(!err.is_retryable());
}

#[test]
fn test_display_includes_state() {
    let err = loop_error::BusySnafu { state: "streaming" }.build();
    assert!(err.to_string().contains("streaming"));
}
