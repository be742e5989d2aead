use super::*;

fn sample_thread_id() -> ThreadId {
    ThreadId::from_string("lace_20250101_abcdef")
}

#[test]
fn test_kind_tags() {
    assert_eq!(
        EventData::UserMessage {
            text: "hi".into()
        }
        .kind(),
        "user_message"
    );
    assert_eq!(
        EventData::Compaction {
            strategy_id: "summarize".into(),
            original_event_count: 50,
            replacement: vec![],
        }
        .kind(),
        "compaction"
    );
}

#[test]
fn test_transient_events() {
    assert!(
        EventData::AgentToken {
            delta: "h".into()
        }
        .is_transient()
    );
    assert!(
        EventData::ToolApprovalRequest {
            request: ApprovalRequest::new("t1", "bash", crate::tool::RiskLevel::High, "rm -rf /"),
        }
        .is_transient()
    );
    assert!(
        !EventData::UserMessage {
            text: "hi".into()
        }
        .is_transient()
    );
    assert!(
        !EventData::ToolApprovalResponse {
            call_id: "t1".into(),
            decision: ApprovalDecision::AllowOnce,
        }
        .is_transient()
    );
}

#[test]
fn test_usage_only_on_agent_message() {
    let usage = TokenUsage::new(10, 2, 12);
    let msg = EventData::AgentMessage {
        text: "hi".into(),
        usage,
        truncated: false,
    };
    assert_eq!(msg.usage(), Some(usage));

    let user = EventData::UserMessage { text: "hi".into() };
    assert_eq!(user.usage(), None);
}

#[test]
fn test_serde_tag_roundtrip() {
    let event = Event::new(
        sample_thread_id(),
        0,
        EventData::ToolCall {
            call_id: "t1".into(),
            name: "file_list".into(),
            arguments: serde_json::json!({"path": "."}),
        },
    );
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["data"]["type"], "tool_call");
    assert_eq!(json["seq"], 0);

    let parsed: Event = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.kind(), "tool_call");
}

#[test]
fn test_unknown_tag_fails_fast() {
    let raw = serde_json::json!({
        "thread_id": "lace_20250101_abcdef",
        "seq": 0,
        "data": {"type": "not_a_real_event"},
    });
    let result: Result<Event, _> = serde_json::from_value(raw);
    assert!(result.is_err());
}

#[test]
fn test_compaction_carries_replacement() {
    let event = EventData::Compaction {
        strategy_id: "summarize-with-model".into(),
        original_event_count: 50,
        replacement: vec![EventData::AgentMessage {
            text: "summary".into(),
            usage: TokenUsage::new(500, 200, 700),
            truncated: false,
        }],
    };
    match event {
        EventData::Compaction { replacement, .. } => assert_eq!(replacement.len(), 1),
        _ => unreachable!(),
    }
}
