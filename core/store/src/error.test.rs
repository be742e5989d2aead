use super::*;
use lace_protocol::ThreadId;

#[test]
fn test_display() {
    let err = store_error::ConflictSnafu {
        thread_id: ThreadId::from_string("lace_20250101_abcdef"),
        message: "prefix already compacted".to_string(),
    }
    .build();
    assert_eq!(
        err.to_string(),
        "conflicting write on thread lace_20250101_abcdef: prefix already compacted"
    );
}

#[test]
fn test_status_codes() {
    let err = store_error::ThreadCorruptSnafu {
        thread_id: ThreadId::from_string("lace_20250101_abcdef"),
        message: "seq gap".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::Internal);
}
