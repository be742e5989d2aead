//! Black-box end-to-end turn scenarios, driven only through `lace_loop`'s
//! public API plus the scripted test doubles the rest of the workspace
//! tests against.
//!
//! Mid-stream cancellation (a caller's per-turn token firing while a
//! stream is open) is covered at the unit level in `src/agent.test.rs`
//! instead: deterministically interleaving a cancellation with a
//! specific event in the middle of a stream needs access to the turn
//! token before it's handed out, which is an implementation detail this
//! crate doesn't expose publicly.

use std::sync::Arc;

use async_trait::async_trait;
use lace_config::RetryConfig;
use lace_context::BudgetManager;
use lace_loop::Agent;
use lace_loop::SummarizeWithModel;
use lace_loop::TurnOutcome;
use lace_protocol::ApprovalDecision;
use lace_protocol::ApprovalRequest;
use lace_protocol::EventData;
use lace_protocol::ThreadId;
use lace_protocol::ToolOutput;
use lace_protocol::TokenUsage;
use lace_provider::FinishReason;
use lace_provider::ProviderEvent;
use lace_provider::ScriptedProvider;
use lace_store::InMemoryThreadStore;
use lace_store::ThreadStore;
use lace_tools::ApprovalCallback;
use lace_tools::DenyAllApprovals;
use lace_tools::Tool;
use lace_tools::ToolAnnotations;
use lace_tools::ToolContext;
use lace_tools::ToolError;
use lace_tools::ToolExecutor;
use lace_tools::ToolRegistry;
use serde_json::json;
use serde_json::Value;

fn thread_id(suffix: &str) -> ThreadId {
    ThreadId::from_string(format!("lace_20260101_{suffix}"))
}

struct FileListTool;

#[async_trait]
impl Tool for FileListTool {
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

    async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text("a.rs\nb.rs\nc.rs"))
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

    async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text("done"))
    }
}

struct DenyCallback;

#[async_trait]
impl ApprovalCallback for DenyCallback {
    async fn request_approval(&self, _request: ApprovalRequest) -> ApprovalDecision {
        ApprovalDecision::Deny
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

#[tokio::test]
async fn scenario_1_simple_echo() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("hi".to_string()),
        ProviderEvent::Usage(TokenUsage::new(10, 2, 12)),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let store = Arc::new(InMemoryThreadStore::new());
    let thread = thread_id("s1");
    let mut agent = Agent::new(
        thread.clone(),
        "session-1",
        store.clone(),
        provider.clone(),
        executor_with(FileListTool, Arc::new(DenyAllApprovals)),
        Arc::new(SummarizeWithModel::new(provider)),
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );

    let outcome = agent.send_message("hello").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Completed { truncated: false, .. }));

    let events = store.events(&thread).unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].data, EventData::UserMessage { .. }));
    match &events[1].data {
        EventData::AgentMessage { text, usage, truncated } => {
            assert_eq!(text, "hi");
            assert_eq!(*usage, TokenUsage::new(10, 2, 12));
            assert!(!truncated);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(agent.budget_status().total, 12);
}

#[tokio::test]
async fn scenario_2_tool_loop() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart { call_id: "t1".to_string(), name: "file_list".to_string() },
            ProviderEvent::ToolCallEnd { call_id: "t1".to_string(), args: json!({"path": "."}) },
            ProviderEvent::Finish(FinishReason::ToolUse),
        ],
        vec![
            ProviderEvent::TextDelta("I found 3 files".to_string()),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let store = Arc::new(InMemoryThreadStore::new());
    let thread = thread_id("s2");
    let mut agent = Agent::new(
        thread.clone(),
        "session-1",
        store.clone(),
        provider.clone(),
        executor_with(FileListTool, Arc::new(DenyAllApprovals)),
        Arc::new(SummarizeWithModel::new(provider)),
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );

    let outcome = agent.send_message("list files").await.unwrap();
    match outcome {
        TurnOutcome::Completed { text, .. } => assert_eq!(text, "I found 3 files"),
        other => panic!("expected Completed, got {other:?}"),
    }

    let events = store.events(&thread).unwrap();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0].data, EventData::UserMessage { .. }));
    assert!(matches!(events[1].data, EventData::ToolCall { .. }));
    assert!(matches!(events[2].data, EventData::ToolResult { is_error: false, .. }));
    assert!(matches!(events[3].data, EventData::AgentMessage { .. }));
}

#[tokio::test]
async fn scenario_3_denied_destructive_tool() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        vec![
            ProviderEvent::ToolCallStart { call_id: "t1".to_string(), name: "bash".to_string() },
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
    let store = Arc::new(InMemoryThreadStore::new());
    let thread = thread_id("s3");
    let mut agent = Agent::new(
        thread.clone(),
        "session-1",
        store.clone(),
        provider.clone(),
        executor_with(BashTool, Arc::new(DenyCallback)),
        Arc::new(SummarizeWithModel::new(provider)),
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );

    agent.send_message("delete everything").await.unwrap();

    let events = store.events(&thread).unwrap();
    let result = events
        .iter()
        .find(|e| matches!(e.data, EventData::ToolResult { .. }))
        .expect("a tool result should have been persisted");
    match &result.data {
        EventData::ToolResult { status, is_error, .. } => {
            assert_eq!(*status, lace_protocol::ToolStatus::Failed);
            assert!(is_error);
        }
        _ => unreachable!(),
    }
    assert!(events.iter().any(|e| matches!(e.data, EventData::ToolApprovalRequest { .. })));
    assert!(events.iter().any(|e| matches!(e.data, EventData::ToolApprovalResponse { .. })));
}

#[tokio::test]
async fn scenario_5_compaction_resets_budget() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        // First turn, pushes the budget over its (tiny, test-only) limit.
        vec![
            ProviderEvent::TextDelta("x".to_string()),
            ProviderEvent::Usage(TokenUsage::new(90, 10, 100)),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        // The compaction strategy's own summarization call.
        vec![
            ProviderEvent::TextDelta("summary of the conversation so far".to_string()),
            ProviderEvent::Usage(TokenUsage::new(500, 200, 700)),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
        // Second turn, after compaction has reset the budget.
        vec![
            ProviderEvent::TextDelta("continuing".to_string()),
            ProviderEvent::Usage(TokenUsage::new(100, 50, 150)),
            ProviderEvent::Finish(FinishReason::EndTurn),
        ],
    ]));
    let store = Arc::new(InMemoryThreadStore::new());
    let thread = thread_id("s5");
    let mut agent = Agent::new(
        thread.clone(),
        "session-1",
        store.clone(),
        provider.clone(),
        executor_with(FileListTool, Arc::new(DenyAllApprovals)),
        Arc::new(SummarizeWithModel::new(provider)),
        BudgetManager::new(100, 0.85, 0),
        RetryConfig::default(),
    );

    agent.send_message("hello").await.unwrap();
    assert!(agent.budget_status().near_limit);

    agent.send_message("keep going").await.unwrap();
    assert_eq!(agent.budget_status().total, 850);

    let events = store.events(&thread).unwrap();
    assert!(events.iter().any(|e| matches!(e.data, EventData::Compaction { .. })));
}
