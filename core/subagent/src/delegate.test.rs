use std::sync::Arc;

use lace_config::RetryConfig;
use lace_config::TokenBudgetConfig;
use lace_loop::LoopEvent;
use lace_loop::SummarizeWithModel;
use lace_protocol::EventData;
use lace_protocol::ThreadId;
use lace_protocol::ToolResultContent;
use lace_provider::FinishReason;
use lace_provider::ProviderEvent;
use lace_provider::ScriptedProvider;
use lace_store::InMemoryThreadStore;
use lace_store::ThreadStore;
use lace_tools::DenyAllApprovals;
use lace_tools::ToolContext;
use lace_tools::ToolExecutor;
use lace_tools::ToolRegistry;
use serde_json::json;

use super::*;

fn parent_thread() -> ThreadId {
    ThreadId::from_string("lace_20260101_parent")
}

fn empty_executor_factory() -> ExecutorFactory {
    Arc::new(|_thread_id: ThreadId| {
        Arc::new(ToolExecutor::new(
            ToolRegistry::new(),
            Vec::new(),
            Vec::new(),
            std::time::Duration::from_secs(5),
            Arc::new(DenyAllApprovals),
        ))
    })
}

fn tool_with(
    parent: ThreadId,
    provider: Arc<ScriptedProvider>,
    max_depth: u32,
    allocator: Arc<ChildThreadAllocator>,
) -> DelegateTool {
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    DelegateTool::new(
        parent,
        "session-1",
        Arc::new(InMemoryThreadStore::new()),
        provider,
        compaction,
        TokenBudgetConfig::default(),
        RetryConfig::default(),
        max_depth,
        allocator,
        empty_executor_factory(),
        empty_event_sink(),
    )
}

#[tokio::test]
async fn test_delegate_runs_child_to_completion_and_returns_its_text() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("summary".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let allocator = Arc::new(ChildThreadAllocator::new());
    let tool = DelegateTool::new(
        parent_thread(),
        "session-1",
        store.clone(),
        provider,
        compaction,
        TokenBudgetConfig::default(),
        RetryConfig::default(),
        3,
        allocator,
        empty_executor_factory(),
        empty_event_sink(),
    );

    let mut ctx = ToolContext::new("call-1", "session-1");
    let output = tool
        .execute(json!({"task": "summarize"}), &mut ctx)
        .await
        .unwrap();

    assert!(!output.is_error);
    match output.content.as_slice() {
        [ToolResultContent::Text(text)] => assert_eq!(text, "summary"),
        other => panic!("expected single text content block, got {other:?}"),
    }

    let child_thread = parent_thread().child(1);
    let events = store.events(&child_thread).unwrap();
    assert_eq!(events.len(), 2);
    match &events[0].data {
        EventData::UserMessage { text } => assert_eq!(text, "summarize"),
        other => panic!("expected UserMessage, got {other:?}"),
    }
    assert!(matches!(events[1].data, EventData::AgentMessage { .. }));
}

#[tokio::test]
async fn test_depth_limit_rejects_delegation_without_spawning() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let allocator = Arc::new(ChildThreadAllocator::new());
    let tool = tool_with(parent_thread(), provider, 0, allocator);

    let mut ctx = ToolContext::new("call-1", "session-1");
    let output = tool
        .execute(json!({"task": "summarize"}), &mut ctx)
        .await
        .unwrap();

    assert!(output.is_error);
    match output.content.as_slice() {
        [ToolResultContent::Text(text)] => assert!(text.contains("depth limit")),
        other => panic!("expected single text content block, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_input_is_reported_as_error_output() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let allocator = Arc::new(ChildThreadAllocator::new());
    let tool = tool_with(parent_thread(), provider, 3, allocator);

    let mut ctx = ToolContext::new("call-1", "session-1");
    let output = tool.execute(json!({}), &mut ctx).await.unwrap();

    assert!(output.is_error);
}

#[tokio::test]
async fn test_repeated_delegation_allocates_sequential_children() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::TextDelta("first".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        vec![
            ProviderEvent::TextDelta("second".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let allocator = Arc::new(ChildThreadAllocator::new());
    let tool = DelegateTool::new(
        parent_thread(),
        "session-1",
        store.clone(),
        provider,
        compaction,
        TokenBudgetConfig::default(),
        RetryConfig::default(),
        3,
        allocator,
        empty_executor_factory(),
        empty_event_sink(),
    );

    let mut ctx = ToolContext::new("call-1", "session-1");
    tool.execute(json!({"task": "first"}), &mut ctx).await.unwrap();
    let mut ctx2 = ToolContext::new("call-2", "session-1");
    tool.execute(json!({"task": "second"}), &mut ctx2).await.unwrap();

    assert!(store.events(&parent_thread().child(1)).unwrap().len() == 2);
    assert!(store.events(&parent_thread().child(2)).unwrap().len() == 2);
}

#[tokio::test]
async fn test_child_events_forward_into_the_event_sink() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("summary".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let allocator = Arc::new(ChildThreadAllocator::new());
    let sink = empty_event_sink();
    let tool = DelegateTool::new(
        parent_thread(),
        "session-1",
        store,
        provider,
        compaction,
        TokenBudgetConfig::default(),
        RetryConfig::default(),
        3,
        allocator,
        empty_executor_factory(),
        sink.clone(),
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    *sink.lock().unwrap() = Some(tx);

    let mut ctx = ToolContext::new("call-1", "session-1");
    tool.execute(json!({"task": "summarize"}), &mut ctx)
        .await
        .unwrap();

    let mut saw_turn_started = false;
    for _ in 0..10 {
        let Ok(Some(event)) =
            tokio::time::timeout(std::time::Duration::from_millis(50), rx.recv()).await
        else {
            break;
        };
        if matches!(event, LoopEvent::TurnStarted { .. }) {
            saw_turn_started = true;
            break;
        }
    }
    assert!(saw_turn_started, "expected the child's TurnStarted event to forward");
}
