use super::*;
use lace_error::ErrorExt;

#[test]
fn test_status_codes() {
    let err = config_error::HomeDirNotFoundSnafu.build();
    assert_eq!(err.status_code(), StatusCode::InvalidConfig);

    let err = config_error::InvalidSnafu {
        message: "max_attempts must be positive".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::InvalidConfig);
    assert!(!err.should_log());
}

#[test]
fn test_display() {
    let err = config_error::InvalidSnafu {
        message: "bad value".to_string(),
    }
    .build();
    assert_eq!(err.to_string(), "invalid config: bad value");
}
