use super::*;

#[test]
fn test_finish_reason_is_error() {
    assert!(FinishReason::Error.is_error());
    assert!(!FinishReason::EndTurn.is_error());
    assert!(!FinishReason::ToolUse.is_error());
}

#[test]
fn test_event_variants_constructible() {
    let start = ProviderEvent::ToolCallStart {
        call_id: "t1".into(),
        name: "file_list".into(),
    };
    assert!(matches!(start, ProviderEvent::ToolCallStart { .. }));

    let finish = ProviderEvent::Finish(FinishReason::EndTurn);
    assert!(matches!(finish, ProviderEvent::Finish(FinishReason::EndTurn)));
}
