use super::*;

#[test]
fn test_transient_is_retryable() {
    let err = provider_error::TransientSnafu {
        message: "429 rate limited".to_string(),
    }
    .build();
    assert!(err.is_retryable());
}

#[test]
fn test_fatal_is_not_retryable() {
    let err = provider_error::FatalSnafu {
        message: "invalid api key".to_string(),
    }
    .build();
    assert!(!err.is_retryable());
}
