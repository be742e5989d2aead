use std::sync::Arc;

use async_trait::async_trait;
use lace_config::RetryConfig;
use lace_context::BudgetManager;
use lace_protocol::EventData;
use lace_protocol::ThreadId;
use lace_protocol::ToolOutput;
use lace_provider::FinishReason;
use lace_provider::ProviderEvent;
use lace_provider::ScriptedProvider;
use lace_store::InMemoryThreadStore;
use lace_store::ThreadStore;
use lace_tools::ApprovalCallback;
use lace_tools::DenyAllApprovals;
use lace_tools::ToolContext as ExecToolContext;
use lace_tools::ToolExecutor;
use lace_tools::ToolRegistry;
use lace_tools::Tool;
use lace_tools::ToolAnnotations;
use lace_tools::ToolError;
use serde_json::json;
use serde_json::Value;

use super::*;
use crate::compaction::SummarizeWithModel;

fn thread_id() -> ThreadId {
    ThreadId::from_string("lace_20260101_bbbbbb")
}

struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "file_list"
    }

    fn description(&self) -> &str {
        "lists files under a path"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "required": ["path"], "properties": {"path": {"type": "string"}}})
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::readonly()
    }

    async fn execute(&self, _input: Value, _ctx: &mut ExecToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text("a.rs\nb.rs\nc.rs"))
    }
}

fn executor_with(tool: impl Tool + 'static, callback: Arc<dyn ApprovalCallback>) -> Arc<ToolExecutor> {
    let mut registry = ToolRegistry::new();
    registry.register(tool);
    Arc::new(ToolExecutor::new(
        registry,
        Vec::new(),
        Vec::new(),
        std::time::Duration::from_secs(5),
        callback,
    ))
}

fn default_agent(
    provider: Arc<ScriptedProvider>,
    executor: Arc<ToolExecutor>,
) -> (Agent, Arc<InMemoryThreadStore>) {
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let agent = Agent::new(
        thread_id(),
        "session-1",
        store.clone(),
        provider,
        executor,
        compaction,
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );
    (agent, store)
}

#[tokio::test]
async fn test_simple_echo_turn() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("hi".to_string()),
        ProviderEvent::Usage(lace_protocol::TokenUsage::new(10, 2, 12)),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let (mut agent, store) = default_agent(provider, executor);

    let outcome = agent.send_message("hello").await.unwrap();

    match outcome {
        TurnOutcome::Completed { text, truncated } => {
            assert_eq!(text, "hi");
            assert!(!truncated);
        }
        other => panic!("expected Completed, got {other:?}"),
    }
    assert_eq!(agent.state(), lace_protocol::AgentState::Idle);

    let events = store.events(&thread_id()).unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].data, EventData::UserMessage { .. }));
    match &events[1].data {
        EventData::AgentMessage { text, usage, .. } => {
            assert_eq!(text, "hi");
            assert_eq!(*usage, lace_protocol::TokenUsage::new(10, 2, 12));
        }
        other => panic!("expected AgentMessage, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tool_loop_persists_call_and_result_then_continues() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart {
                call_id: "t1".to_string(),
                name: "file_list".to_string(),
            },
            ProviderEvent::ToolCallEnd {
                call_id: "t1".to_string(),
                args: json!({"path": "."}),
            },
            ProviderEvent::Finish(FinishReason::ToolUse),
        ],
        vec![
            ProviderEvent::TextDelta("I found 3 files".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let (mut agent, store) = default_agent(provider, executor);

    let outcome = agent.send_message("list files").await.unwrap();

    match outcome {
        TurnOutcome::Completed { text, .. } => assert_eq!(text, "I found 3 files"),
        other => panic!("expected Completed, got {other:?}"),
    }

    let events = store.events(&thread_id()).unwrap();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0].data, EventData::UserMessage { .. }));
    assert!(matches!(events[1].data, EventData::ToolCall { .. }));
    match &events[2].data {
        EventData::ToolResult { call_id, is_error, .. } => {
            assert_eq!(call_id, "t1");
            assert!(!is_error);
        }
        other => panic!("expected ToolResult, got {other:?}"),
    }
    assert!(matches!(events[3].data, EventData::AgentMessage { .. }));
}

struct DenyCallback;

#[async_trait]
impl ApprovalCallback for DenyCallback {
    async fn request_approval(
        &self,
        _request: lace_protocol::ApprovalRequest,
    ) -> lace_protocol::ApprovalDecision {
        lace_protocol::ApprovalDecision::Deny
    }
}

struct BashTool;

#[async_trait]
impl Tool for BashTool {
    fn name(&self) -> &str {
        "bash"
    }

    fn description(&self) -> &str {
        "runs a shell command"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "required": ["command"], "properties": {"command": {"type": "string"}}})
    }

    async fn execute(&self, _input: Value, _ctx: &mut ExecToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text("done"))
    }
}

#[tokio::test]
async fn test_denied_destructive_tool_continues_loop() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart {
                call_id: "t1".to_string(),
                name: "bash".to_string(),
            },
            ProviderEvent::ToolCallEnd {
                call_id: "t1".to_string(),
                args: json!({"command": "rm -rf /"}),
            },
            ProviderEvent::Finish(FinishReason::ToolUse),
        ],
        vec![
            ProviderEvent::TextDelta("can't do that".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let executor = executor_with(BashTool, Arc::new(DenyCallback));
    let (mut agent, store) = default_agent(provider, executor);

    agent.send_message("delete everything").await.unwrap();

    let events = store.events(&thread_id()).unwrap();
    let tool_result = events
        .iter()
        .find(|e| matches!(e.data, EventData::ToolResult { .. }))
        .unwrap();
    match &tool_result.data {
        EventData::ToolResult { is_error, .. } => assert!(is_error),
        _ => unreachable!(),
    }
    assert!(events.iter().any(|e| matches!(e.data, EventData::ToolApprovalRequest { .. })));
    assert!(events.iter().any(|e| matches!(e.data, EventData::ToolApprovalResponse { .. })));
}

#[tokio::test]
async fn test_busy_rejects_concurrent_send_message() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("hi".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let (mut agent, _store) = default_agent(provider, executor);

    agent.send_message("hello").await.unwrap();
    // Idle again, a second call is fine; force Busy by manipulating state.
    agent.state = lace_protocol::AgentState::Thinking;
    let err = agent.send_message("again").await.unwrap_err();
    assert_eq!(err.status_code(), lace_error::StatusCode::InvalidRequest);
}

/// A [`lace_provider::Provider`] that cancels a shared token as soon as
/// it is asked to stream, simulating a caller cancelling mid-turn
/// without relying on real concurrency: the agent's turn-cancellation
/// check runs on every event the stream yields, so a token already
/// cancelled before the first event still takes effect before any text
/// is persisted.
struct CancelOnOpen {
    token: tokio_util::sync::CancellationToken,
}

#[async_trait]
impl lace_provider::Provider for CancelOnOpen {
    async fn complete(
        &self,
        _messages: Vec<lace_provider::Message>,
        _tools: Vec<lace_provider::ToolSpec>,
        _options: lace_provider::CompleteOptions,
    ) -> Result<lace_provider::EventStream, lace_provider::ProviderError> {
        self.token.cancel();
        Ok(Box::pin(tokio_stream::iter(vec![
            ProviderEvent::TextDelta("first".to_string()),
            ProviderEvent::TextDelta(" second".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ])))
    }
}

#[tokio::test]
async fn test_cancellation_mid_stream_discards_buffered_text() {
    let store = Arc::new(InMemoryThreadStore::new());
    let dummy_provider = Arc::new(ScriptedProvider::new(vec![]));
    let compaction = Arc::new(SummarizeWithModel::new(dummy_provider));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let mut agent = Agent::new(
        thread_id(),
        "session-1",
        store.clone(),
        Arc::new(CancelOnOpen {
            token: tokio_util::sync::CancellationToken::new(),
        }),
        executor,
        compaction,
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );
    // Swap in a provider that cancels the agent's own shutdown token
    // (the parent `turn_token` is derived from), so the derived child
    // created inside `send_message` is already cancelled by the time
    // the stream's first event arrives.
    agent.provider = Arc::new(CancelOnOpen {
        token: agent.shutdown_token.clone(),
    });

    let outcome = agent.send_message("hello").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Stopped));
    assert_eq!(agent.state(), lace_protocol::AgentState::Idle);

    let events = store.events(&thread_id()).unwrap();
    // Only the user message persisted; no AgentMessage from the
    // cancelled stream.
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].data, EventData::UserMessage { .. }));
}

#[tokio::test]
async fn test_shutdown_reaches_stopped_and_rejects_further_input() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let (mut agent, _store) = default_agent(provider, executor);

    agent.shutdown();
    assert_eq!(agent.state(), lace_protocol::AgentState::Stopped);

    let result = agent.send_message("hello").await;
    assert!(matches!(result, Err(LoopError::Busy { .. })));
}

#[tokio::test]
async fn test_missing_usage_falls_back_to_the_estimator() {
    // No `ProviderEvent::Usage` anywhere in this turn.
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("hi there".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let (mut agent, store) = default_agent(provider, executor);

    agent.send_message("hello").await.unwrap();

    assert!(agent.budget_status().total > 0, "estimator fallback should have recorded some usage");

    let events = store.events(&thread_id()).unwrap();
    match &events[1].data {
        EventData::AgentMessage { usage, .. } => {
            assert!(usage.total > 0);
        }
        other => panic!("expected AgentMessage, got {other:?}"),
    }
}

#[tokio::test]
async fn test_can_request_gate_triggers_compaction_before_opening_a_stream() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        // Consumed by the compaction summarizer call.
        vec![
            ProviderEvent::TextDelta("summary".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        // Consumed by the actual turn, once the gate lets it through.
        vec![
            ProviderEvent::TextDelta("ok".to_string()),
            ProviderEvent::Usage(lace_protocol::TokenUsage::new(5, 1, 6)),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let executor = executor_with(ListFilesTool, Arc::new(DenyAllApprovals));
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    // A near-exhausted budget: any nonzero prompt estimate fails `can_request`.
    let mut agent = Agent::new(
        thread_id(),
        "session-1",
        store.clone(),
        provider,
        executor,
        compaction,
        BudgetManager::new(1, 0.85, 0),
        RetryConfig::default(),
    );

    agent.send_message("hello").await.unwrap();

    let events = store.events(&thread_id()).unwrap();
    assert!(
        events.iter().any(|e| matches!(e.data, EventData::Compaction { .. })),
        "expected a compaction event before the stream opened"
    );
}
