use super::*;
use lace_protocol::ThreadId;

fn thread_id() -> ThreadId {
    ThreadId::from_string("lace_20250101_abcdef")
}

#[test]
fn test_record_accumulates() {
    let mut manager = BudgetManager::new(1000, 0.85, 50);
    manager.record(TokenUsage::new(10, 2, 12));
    manager.record(TokenUsage::new(5, 1, 6));
    assert_eq!(manager.status().total, 18);
    assert_eq!(manager.prompt_tokens(), 15);
    assert_eq!(manager.completion_tokens(), 3);
}

#[test]
fn test_near_limit_threshold() {
    let mut manager = BudgetManager::new(100, 0.85, 0);
    manager.record(TokenUsage::new(80, 4, 84));
    assert!(!manager.status().near_limit);
    manager.record(TokenUsage::new(1, 0, 1));
    assert!(manager.status().near_limit);
}

#[test]
fn test_can_request_accounts_for_reserve() {
    let mut manager = BudgetManager::new(100, 0.85, 10);
    manager.record(TokenUsage::new(80, 0, 80));
    assert!(manager.can_request(5));
    assert!(!manager.can_request(11));
}

#[test]
fn test_compaction_resets_then_resumes() {
    let mut manager = BudgetManager::new(1_000_000, 0.85, 0);
    for _ in 0..50 {
        manager.record(TokenUsage::new(3_600, 0, 3_600));
    }
    assert_eq!(manager.status().total, 180_000);

    let summary = EventData::AgentMessage {
        text: "summary".into(),
        usage: TokenUsage::new(500, 200, 700),
        truncated: false,
    };
    manager.handle_compaction(&[summary]);
    assert_eq!(manager.status().total, 700);

    manager.record(TokenUsage::new(100, 50, 150));
    assert_eq!(manager.status().total, 850);
}

#[test]
fn test_from_events_sums_all_when_no_compaction() {
    let id = thread_id();
    let events = vec![
        Event::new(
            id.clone(),
            0,
            EventData::AgentMessage {
                text: "a".into(),
                usage: TokenUsage::new(10, 2, 12),
                truncated: false,
            },
        ),
        Event::new(
            id.clone(),
            1,
            EventData::AgentMessage {
                text: "b".into(),
                usage: TokenUsage::new(5, 1, 6),
                truncated: false,
            },
        ),
    ];
    let manager = BudgetManager::from_events(1000, 0.85, 0, &events);
    assert_eq!(manager.status().total, 18);
}

#[test]
fn test_from_events_ignores_everything_before_last_compaction() {
    let id = thread_id();
    let events = vec![
        Event::new(
            id.clone(),
            0,
            EventData::AgentMessage {
                text: "stale".into(),
                usage: TokenUsage::new(1_000, 1_000, 2_000),
                truncated: false,
            },
        ),
        Event::new(
            id.clone(),
            1,
            EventData::Compaction {
                strategy_id: "summarize-with-model".into(),
                original_event_count: 1,
                replacement: vec![EventData::AgentMessage {
                    text: "summary".into(),
                    usage: TokenUsage::new(500, 200, 700),
                    truncated: false,
                }],
            },
        ),
        Event::new(
            id,
            2,
            EventData::AgentMessage {
                text: "after".into(),
                usage: TokenUsage::new(100, 50, 150),
                truncated: false,
            },
        ),
    ];
    let manager = BudgetManager::from_events(1_000_000, 0.85, 0, &events);
    assert_eq!(manager.status().total, 850);
}
