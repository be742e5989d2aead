use lace_protocol::ThreadId;
use lace_protocol::TokenUsage;
use lace_protocol::ToolStatus;
use serde_json::json;

use super::*;

fn event(thread_id: &ThreadId, seq: u64, data: EventData) -> Event {
    Event::new(thread_id.clone(), seq, data)
}

#[test]
fn test_simple_echo_transcript() {
    let tid = ThreadId::new_root();
    let events = vec![
        event(
            &tid,
            0,
            EventData::UserMessage {
                text: "hello".to_string(),
            },
        ),
        event(
            &tid,
            1,
            EventData::AgentMessage {
                text: "hi".to_string(),
                usage: TokenUsage::new(10, 2, 12),
                truncated: false,
            },
        ),
    ];

    let messages = assemble_prompt(&events, &AssembleOptions::default());
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].content, "hi");
}

#[test]
fn test_tool_call_and_result_roundtrip() {
    let tid = ThreadId::new_root();
    let events = vec![
        event(
            &tid,
            0,
            EventData::ToolCall {
                call_id: "t1".to_string(),
                name: "file_list".to_string(),
                arguments: json!({"path": "."}),
            },
        ),
        event(
            &tid,
            1,
            EventData::ToolResult {
                call_id: "t1".to_string(),
                status: ToolStatus::Completed,
                content: vec![lace_protocol::ToolResultContent::text("a.rs\nb.rs")],
                is_error: false,
            },
        ),
    ];

    let messages = assemble_prompt(&events, &AssembleOptions::default());
    assert_eq!(messages.len(), 2);
    assert!(messages[0].content.contains("file_list"));
    assert_eq!(messages[1].tool_call_id.as_deref(), Some("t1"));
    assert_eq!(messages[1].content, "a.rs\nb.rs");
}

#[test]
fn test_transient_events_are_skipped() {
    let tid = ThreadId::new_root();
    let events = vec![event(
        &tid,
        0,
        EventData::AgentToken {
            delta: "h".to_string(),
        },
    )];
    assert!(assemble_prompt(&events, &AssembleOptions::default()).is_empty());
}

#[test]
fn test_empty_agent_message_produces_no_assistant_turn() {
    let tid = ThreadId::new_root();
    let events = vec![event(
        &tid,
        0,
        EventData::AgentMessage {
            text: String::new(),
            usage: TokenUsage::new(5, 0, 5),
            truncated: false,
        },
    )];
    assert!(assemble_prompt(&events, &AssembleOptions::default()).is_empty());
}

#[test]
fn test_compaction_expands_replacement_in_place() {
    let tid = ThreadId::new_root();
    let events = vec![event(
        &tid,
        0,
        EventData::Compaction {
            strategy_id: "summarize".to_string(),
            original_event_count: 50,
            replacement: vec![EventData::AgentMessage {
                text: "summary of earlier turns".to_string(),
                usage: TokenUsage::new(500, 200, 700),
                truncated: false,
            }],
        },
    )];

    let messages = assemble_prompt(&events, &AssembleOptions::default());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "summary of earlier turns");
}

#[test]
fn test_merge_consecutive_same_role() {
    let tid = ThreadId::new_root();
    let events = vec![
        event(
            &tid,
            0,
            EventData::UserMessage {
                text: "first".to_string(),
            },
        ),
        event(
            &tid,
            1,
            EventData::UserMessage {
                text: "second".to_string(),
            },
        ),
    ];

    let messages = assemble_prompt(&events, &AssembleOptions::default());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "first\nsecond");
}

#[test]
fn test_merge_consecutive_disabled() {
    let tid = ThreadId::new_root();
    let events = vec![
        event(
            &tid,
            0,
            EventData::UserMessage {
                text: "first".to_string(),
            },
        ),
        event(
            &tid,
            1,
            EventData::UserMessage {
                text: "second".to_string(),
            },
        ),
    ];

    let options = AssembleOptions {
        merge_consecutive: false,
    };
    let messages = assemble_prompt(&events, &options);
    assert_eq!(messages.len(), 2);
}

#[test]
fn test_does_not_merge_across_tool_result() {
    let tid = ThreadId::new_root();
    let events = vec![
        event(
            &tid,
            0,
            EventData::ToolResult {
                call_id: "t1".to_string(),
                status: ToolStatus::Completed,
                content: vec![lace_protocol::ToolResultContent::text("one")],
                is_error: false,
            },
        ),
        event(
            &tid,
            1,
            EventData::ToolResult {
                call_id: "t2".to_string(),
                status: ToolStatus::Completed,
                content: vec![lace_protocol::ToolResultContent::text("two")],
                is_error: false,
            },
        ),
    ];

    let messages = assemble_prompt(&events, &AssembleOptions::default());
    assert_eq!(messages.len(), 2);
}
