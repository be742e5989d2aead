use super::*;

#[test]
fn test_event_is_cloneable() {
    let event = LoopEvent::TextDelta {
        delta: "hi".to_string(),
    };
    let cloned = event.clone();
    assert!(matches!(cloned, LoopEvent::TextDelta { .. }));
}
