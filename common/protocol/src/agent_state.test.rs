use super::*;

#[test]
fn test_default_is_idle() {
    assert_eq!(AgentState::default(), AgentState::Idle);
}

#[test]
fn test_accepts_input_only_when_idle() {
    assert!(AgentState::Idle.accepts_input());
    assert!(!AgentState::Thinking.accepts_input());
    assert!(!AgentState::Streaming.accepts_input());
    assert!(!AgentState::AwaitingTool.accepts_input());
}

#[test]
fn test_busy_states() {
    assert!(!AgentState::Idle.is_busy());
    assert!(AgentState::Thinking.is_busy());
    assert!(AgentState::Streaming.is_busy());
    assert!(AgentState::AwaitingTool.is_busy());
    assert!(AgentState::Stopping.is_busy());
    assert!(!AgentState::Stopped.is_busy());
    assert!(!AgentState::Error.is_busy());
}

#[test]
fn test_serde_snake_case() {
    let json = serde_json::to_string(&AgentState::AwaitingTool).unwrap();
    assert_eq!(json, "\"awaiting_tool\"");
}
