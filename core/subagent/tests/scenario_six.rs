//! End-to-end delegation: a parent agent calls `delegate`, a child thread
//! runs to completion, and the parent observes the result as an ordinary
//! `TOOL_RESULT` event.

use std::sync::Arc;

use lace_config::RetryConfig;
use lace_config::TokenBudgetConfig;
use lace_context::BudgetManager;
use lace_loop::Agent;
use lace_loop::SummarizeWithModel;
use lace_loop::TurnOutcome;
use lace_protocol::EventData;
use lace_protocol::ThreadId;
use lace_protocol::ToolResultContent;
use lace_protocol::ToolStatus;
use lace_provider::FinishReason;
use lace_provider::ProviderEvent;
use lace_provider::ScriptedProvider;
use lace_store::InMemoryThreadStore;
use lace_store::ThreadStore;
use lace_subagent::ChildThreadAllocator;
use lace_subagent::DelegateTool;
use lace_tools::DenyAllApprovals;
use lace_tools::ToolExecutor;
use lace_tools::ToolRegistry;
use serde_json::json;

fn thread_id() -> ThreadId {
    ThreadId::from_string("lace_20260101_root")
}

#[tokio::test]
async fn scenario_6_delegation_runs_child_and_parent_sees_tool_result() {
    // Parent's turn: one call to `delegate`. Child's turn: plain text.
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart {
                call_id: "d1".to_string(),
                name: "delegate".to_string(),
            },
            ProviderEvent::ToolCallEnd {
                call_id: "d1".to_string(),
                args: json!({"task": "summarize"}),
            },
            ProviderEvent::Finish(FinishReason::ToolUse),
        ],
        vec![
            ProviderEvent::TextDelta("summary".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        vec![
            ProviderEvent::TextDelta("done delegating".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let allocator = Arc::new(ChildThreadAllocator::new());

    let executor_factory: lace_subagent::ExecutorFactory = {
        let store = store.clone();
        let provider: Arc<dyn lace_provider::Provider> = provider.clone();
        let allocator = allocator.clone();
        Arc::new(move |thread_id: ThreadId| {
            build_executor_for(thread_id, store.clone(), provider.clone(), allocator.clone())
        })
    };

    let root_executor = executor_factory(thread_id());

    let mut agent = Agent::new(
        thread_id(),
        "session-1",
        store.clone(),
        provider,
        root_executor,
        compaction,
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );

    let outcome = agent.send_message("please summarize via a child agent").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Completed { .. }));

    let events = store.events(&thread_id()).unwrap();
    let tool_result = events
        .iter()
        .find(|e| matches!(e.data, EventData::ToolResult { .. }))
        .expect("parent thread should have a TOOL_RESULT for the delegate call");
    match &tool_result.data {
        EventData::ToolResult {
            call_id,
            status,
            content,
            is_error,
        } => {
            assert_eq!(call_id, "d1");
            assert_eq!(*status, ToolStatus::Completed);
            assert!(!is_error);
            match content.as_slice() {
                [ToolResultContent::Text(text)] => assert_eq!(text, "summary"),
                other => panic!("expected single text content block, got {other:?}"),
            }
        }
        other => panic!("expected ToolResult, got {other:?}"),
    }

    let child_thread = thread_id().child(1);
    let child_events = store.events(&child_thread).unwrap();
    assert_eq!(child_events.len(), 2);
    assert!(matches!(child_events[0].data, EventData::UserMessage { .. }));
    assert!(matches!(child_events[1].data, EventData::AgentMessage { .. }));
}

fn build_executor_for(
    thread_id: ThreadId,
    store: Arc<InMemoryThreadStore>,
    provider: Arc<dyn lace_provider::Provider>,
    allocator: Arc<ChildThreadAllocator>,
) -> Arc<ToolExecutor> {
    let mut registry = ToolRegistry::new();
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let nested_store = store.clone();
    let nested_provider = provider.clone();
    let nested_allocator = allocator.clone();
    let nested_factory: lace_subagent::ExecutorFactory = Arc::new(move |child_thread_id: ThreadId| {
        build_executor_for(
            child_thread_id,
            nested_store.clone(),
            nested_provider.clone(),
            nested_allocator.clone(),
        )
    });
    registry.register(DelegateTool::new(
        thread_id,
        "session-1",
        store,
        provider,
        compaction,
        TokenBudgetConfig::default(),
        RetryConfig::default(),
        3,
        allocator,
        nested_factory,
    ));
    Arc::new(ToolExecutor::new(
        registry,
        Vec::new(),
        Vec::new(),
        std::time::Duration::from_secs(5),
        Arc::new(DenyAllApprovals),
    ))
}
