use super::*;

#[test]
fn test_user_stopped_is_not_cancelled() {
    let err = tool_error::UserStoppedSnafu {
        call_id: "t1".to_string(),
        tool_name: "bash".to_string(),
    }
    .build();
    assert!(!err.is_cancelled());
    assert_eq!(err.status_code(), StatusCode::Cancelled);
}

#[test]
fn test_cancelled_is_cancelled() {
    let err = tool_error::CancelledSnafu.build();
    assert!(err.is_cancelled());
}

#[test]
fn test_halts_loop() {
    let stopped = tool_error::UserStoppedSnafu {
        call_id: "t1".to_string(),
        tool_name: "bash".to_string(),
    }
    .build();
    assert!(stopped.halts_loop());

    let failed = tool_error::ExecutionFailedSnafu {
        message: "boom".to_string(),
    }
    .build();
    assert!(!failed.halts_loop());
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::other("disk full");
    let err: ToolError = io_err.into();
    assert_eq!(err.status_code(), StatusCode::IoError);
}
