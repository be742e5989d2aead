use std::sync::Arc;

use assert_matches::assert_matches;
use lace_config::Config;
use lace_protocol::EventData;
use lace_provider::FinishReason;
use lace_provider::ProviderEvent;
use lace_provider::ScriptedProvider;
use lace_store::InMemoryThreadStore;
use lace_store::ThreadStore;
use lace_tools::ApprovalCallback;
use lace_tools::DenyAllApprovals;
use lace_tools::ToolRegistry;
use serde_json::json;

use super::*;

fn empty_tools() -> ToolRegistryFactory {
    Arc::new(ToolRegistry::new)
}

#[tokio::test]
async fn test_send_message_runs_root_agent_to_completion() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("hello there".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let store = Arc::new(InMemoryThreadStore::new());
    let mut session = Session::new(
        PathBuf::from("/tmp/project"),
        store.clone(),
        provider,
        Config::default(),
        empty_tools(),
        Arc::new(DenyAllApprovals),
    );

    let outcome = session.send_message("hi").await.unwrap();
    assert_matches!(outcome, TurnOutcome::Completed { text, .. } if text == "hello there");

    let events = store.events(session.root_thread_id()).unwrap();
    assert!(events.iter().any(|e| matches!(e.data, EventData::UserMessage { .. })));
}

#[tokio::test]
async fn test_delegate_tool_is_registered_automatically_and_runs_a_child() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart {
                call_id: "d1".to_string(),
                name: "delegate".to_string(),
            },
            ProviderEvent::ToolCallEnd {
                call_id: "d1".to_string(),
                args: json!({"task": "summarize this"}),
            },
            ProviderEvent::Finish(FinishReason::ToolUse),
        ],
        vec![
            ProviderEvent::TextDelta("summary".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        vec![
            ProviderEvent::TextDelta("done".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let store = Arc::new(InMemoryThreadStore::new());
    let mut session = Session::new(
        PathBuf::from("/tmp/project"),
        store.clone(),
        provider,
        Config::default(),
        empty_tools(),
        Arc::new(DenyAllApprovals),
    );

    let root = session.root_thread_id().clone();
    let outcome = session.send_message("please delegate").await.unwrap();
    assert_matches!(outcome, TurnOutcome::Completed { .. });

    let children = session.child_threads();
    assert_eq!(children, vec![root.child(1)]);

    let child_events = store.events(&root.child(1)).unwrap();
    assert_eq!(child_events.len(), 2);
}

#[tokio::test]
async fn test_cancel_marks_session_cancelled() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let store = Arc::new(InMemoryThreadStore::new());
    let session = Session::new(
        PathBuf::from("/tmp/project"),
        store,
        provider,
        Config::default(),
        empty_tools(),
        Arc::new(DenyAllApprovals),
    );

    assert!(!session.is_cancelled());
    session.cancel();
    assert!(session.is_cancelled());
}

struct AllowSessionOnce;

#[async_trait::async_trait]
impl ApprovalCallback for AllowSessionOnce {
    async fn request_approval(
        &self,
        _request: lace_protocol::ApprovalRequest,
    ) -> lace_protocol::ApprovalDecision {
        lace_protocol::ApprovalDecision::AllowSession
    }
}

#[tokio::test]
async fn test_no_child_threads_before_any_delegation() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("ok".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let store = Arc::new(InMemoryThreadStore::new());
    let mut session = Session::new(
        PathBuf::from("/tmp/project"),
        store,
        provider,
        Config::default(),
        empty_tools(),
        Arc::new(AllowSessionOnce),
    );

    session.send_message("hi").await.unwrap();
    assert!(session.child_threads().is_empty());
}

#[tokio::test]
async fn test_subscribe_sees_root_and_delegated_child_events() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart {
                call_id: "d1".to_string(),
                name: "delegate".to_string(),
            },
            ProviderEvent::ToolCallEnd {
                call_id: "d1".to_string(),
                args: json!({"task": "summarize this"}),
            },
            ProviderEvent::Finish(FinishReason::ToolUse),
        ],
        vec![
            ProviderEvent::TextDelta("summary".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        vec![
            ProviderEvent::TextDelta("done".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let store = Arc::new(InMemoryThreadStore::new());
    let mut session = Session::new(
        PathBuf::from("/tmp/project"),
        store,
        provider,
        Config::default(),
        empty_tools(),
        Arc::new(DenyAllApprovals),
    );

    let mut rx = session.subscribe();
    session.send_message("please delegate").await.unwrap();

    let mut saw_root_turn = false;
    let mut saw_child_turn = false;
    for _ in 0..64 {
        let Ok(Some(event)) =
            tokio::time::timeout(std::time::Duration::from_millis(50), rx.recv()).await
        else {
            break;
        };
        match event {
            LoopEvent::TurnStarted { thread_id, .. } if thread_id == *session.root_thread_id() => {
                saw_root_turn = true;
            }
            LoopEvent::TurnStarted { .. } => saw_child_turn = true,
            _ => {}
        }
        if saw_root_turn && saw_child_turn {
            break;
        }
    }

    assert!(saw_root_turn, "expected the root agent's events to surface");
    assert!(saw_child_turn, "expected the delegated child's events to surface");
}
