use super::*;
use lace_protocol::TokenUsage;

fn thread_id() -> ThreadId {
    ThreadId::from_string("lace_20250101_abcdef")
}

#[test]
fn test_append_assigns_increasing_seq() {
    let store = InMemoryThreadStore::new();
    let id = thread_id();
    let e0 = store
        .append(&id, EventData::UserMessage { text: "hi".into() })
        .unwrap();
    let e1 = store
        .append(
            &id,
            EventData::AgentMessage {
                text: "hello".into(),
                usage: TokenUsage::new(1, 1, 2),
                truncated: false,
            },
        )
        .unwrap();
    assert_eq!(e0.seq, 0);
    assert_eq!(e1.seq, 1);
    assert!(e1.timestamp >= e0.timestamp);
}

#[test]
fn test_events_empty_for_unknown_thread() {
    let store = InMemoryThreadStore::new();
    let events = store.events(&thread_id()).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_latest_thread_id_tracks_most_recent_append() {
    let store = InMemoryThreadStore::new();
    assert_eq!(store.latest_thread_id(), None);
    let a = ThreadId::from_string("lace_20250101_aaaaaa");
    let b = ThreadId::from_string("lace_20250101_bbbbbb");
    store
        .append(&a, EventData::UserMessage { text: "a".into() })
        .unwrap();
    store
        .append(&b, EventData::UserMessage { text: "b".into() })
        .unwrap();
    assert_eq!(store.latest_thread_id(), Some(b));
}

#[test]
fn test_compact_replaces_prefix_atomically() {
    let store = InMemoryThreadStore::new();
    let id = thread_id();
    for i in 0..5 {
        store
            .append(
                &id,
                EventData::UserMessage {
                    text: format!("msg {i}"),
                },
            )
            .unwrap();
    }
    let summary = EventData::AgentMessage {
        text: "summary".into(),
        usage: TokenUsage::new(500, 200, 700),
        truncated: false,
    };
    store.compact(&id, "summarize-with-model", 4, vec![summary]).unwrap();

    let events = store.events(&id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), "compaction");
    assert_eq!(events[0].seq, 0);
    match &events[0].data {
        EventData::Compaction {
            original_event_count,
            replacement,
            ..
        } => {
            assert_eq!(*original_event_count, 5);
            assert_eq!(replacement.len(), 1);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_compact_preserves_tail_events_renumbered() {
    let store = InMemoryThreadStore::new();
    let id = thread_id();
    for i in 0..3 {
        store
            .append(
                &id,
                EventData::UserMessage {
                    text: format!("msg {i}"),
                },
            )
            .unwrap();
    }
    store.compact(&id, "summarize-with-model", 1, vec![]).unwrap();
    store
        .append(&id, EventData::UserMessage { text: "after".into() })
        .unwrap();

    let events = store.events(&id).unwrap();
    // [compaction, msg 2 (tail), after]
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind(), "compaction");
    assert_eq!(events[1].seq, 1);
    assert_eq!(events[2].seq, 2);
}

#[test]
fn test_compact_out_of_range_is_conflict() {
    let store = InMemoryThreadStore::new();
    let id = thread_id();
    store
        .append(&id, EventData::UserMessage { text: "only one".into() })
        .unwrap();
    let result = store.compact(&id, "summarize-with-model", 5, vec![]);
    assert!(matches!(result, Err(StoreError::Conflict { .. })));
}
