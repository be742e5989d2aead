use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lace_protocol::ToolOutput;
use serde_json::json;
use serde_json::Value;

use super::*;
use crate::tool::Tool;
use crate::tool::ToolAnnotations;

struct EchoTool {
    annotations: ToolAnnotations,
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "echoes its input"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "required": ["text"], "properties": {"text": {"type": "string"}}})
    }

    fn annotations(&self) -> ToolAnnotations {
        self.annotations
    }

    async fn execute(&self, input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let text = input.get("text").and_then(|v| v.as_str()).unwrap_or_default();
        Ok(ToolOutput::text(text.to_string()))
    }
}

struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing"
    }

    fn description(&self) -> &str {
        "always fails"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::readonly()
    }

    async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        crate::error::tool_error::ExecutionFailedSnafu {
            message: "boom".to_string(),
        }
        .fail()
    }
}

struct SlowTool;

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        "slow"
    }

    fn description(&self) -> &str {
        "never finishes in time"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::readonly()
    }

    async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(ToolOutput::text("too late"))
    }
}

struct FixedApproval(ApprovalDecision);

#[async_trait]
impl ApprovalCallback for FixedApproval {
    async fn request_approval(&self, _request: ApprovalRequest) -> ApprovalDecision {
        self.0
    }
}

struct CountingApproval {
    calls: AtomicUsize,
    decision: ApprovalDecision,
}

#[async_trait]
impl ApprovalCallback for CountingApproval {
    async fn request_approval(&self, _request: ApprovalRequest) -> ApprovalDecision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decision
    }
}

fn registry_with(tool: impl Tool + 'static) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tool);
    registry
}

fn executor_with(
    registry: ToolRegistry,
    auto_approve: Vec<String>,
    deny_list: Vec<String>,
    callback: Arc<dyn ApprovalCallback>,
) -> ToolExecutor {
    ToolExecutor::new(registry, auto_approve, deny_list, Duration::from_secs(5), callback)
}

fn call(name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        call_id: "call-1".to_string(),
        name: name.to_string(),
        arguments,
    }
}

#[tokio::test]
async fn test_unknown_tool_is_failed_output_not_error() {
    let executor = executor_with(
        ToolRegistry::new(),
        vec![],
        vec![],
        Arc::new(DenyAllApprovals),
    );
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor.execute(&call("nope", json!({})), &mut ctx).await.unwrap();

    assert!(outcome.output.is_error);
    assert!(outcome.approval.is_none());
    assert!(!outcome.halt);
}

#[tokio::test]
async fn test_validation_failure_is_failed_output() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::readonly(),
    });
    let executor = executor_with(registry, vec![], vec![], Arc::new(DenyAllApprovals));
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({})), &mut ctx)
        .await
        .unwrap();

    assert!(outcome.output.is_error);
    assert!(outcome.approval.is_none());
}

#[tokio::test]
async fn test_readonly_low_risk_auto_allows_without_approval_callback() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::readonly(),
    });
    let callback = Arc::new(CountingApproval {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::Deny,
    });
    let executor = executor_with(registry, vec![], vec![], callback.clone());
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"text": "hi"})), &mut ctx)
        .await
        .unwrap();

    assert!(!outcome.output.is_error);
    assert_eq!(callback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deny_list_short_circuits_before_approval_callback() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::readonly(),
    });
    let callback = Arc::new(CountingApproval {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::AllowOnce,
    });
    let executor = executor_with(registry, vec![], vec!["echo".to_string()], callback.clone());
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"text": "hi"})), &mut ctx)
        .await
        .unwrap();

    assert!(outcome.output.is_error);
    assert_eq!(callback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_destructive_tool_asks_approval_callback() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let callback = Arc::new(FixedApproval(ApprovalDecision::AllowOnce));
    let executor = executor_with(registry, vec![], vec![], callback);
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"text": "hi"})), &mut ctx)
        .await
        .unwrap();

    assert!(!outcome.output.is_error);
    assert!(outcome.approval.is_some());
    assert_eq!(
        outcome.approval.unwrap().decision,
        ApprovalDecision::AllowOnce
    );
}

#[tokio::test]
async fn test_approval_deny_fails_the_call_without_halting() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let callback = Arc::new(FixedApproval(ApprovalDecision::Deny));
    let executor = executor_with(registry, vec![], vec![], callback);
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"text": "hi"})), &mut ctx)
        .await
        .unwrap();

    assert!(outcome.output.is_error);
    assert!(!outcome.halt);
}

#[tokio::test]
async fn test_approval_stop_halts_but_still_records_the_decision() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let callback = Arc::new(FixedApproval(ApprovalDecision::Stop));
    let executor = executor_with(registry, vec![], vec![], callback);
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"text": "hi"})), &mut ctx)
        .await
        .unwrap();

    assert!(outcome.halt);
    assert_eq!(outcome.approval.unwrap().decision, ApprovalDecision::Stop);
}

#[tokio::test]
async fn test_allow_session_is_cached_across_calls() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let callback = Arc::new(CountingApproval {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::AllowSession,
    });
    let executor = executor_with(registry, vec![], vec![], callback.clone());
    let mut ctx = ToolContext::new("call-1", "session-1");

    executor
        .execute(&call("echo", json!({"text": "one"})), &mut ctx)
        .await
        .unwrap();
    executor
        .execute(&call("echo", json!({"text": "two"})), &mut ctx)
        .await
        .unwrap();

    assert_eq!(callback.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_tool_body_converts_to_failed_output() {
    let registry = registry_with(FailingTool);
    let executor = executor_with(registry, vec![], vec![], Arc::new(DenyAllApprovals));
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("failing", json!({})), &mut ctx)
        .await
        .unwrap();

    assert!(outcome.output.is_error);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_converts_to_failed_output() {
    let registry = registry_with(SlowTool);
    let executor = ToolExecutor::new(
        registry,
        vec![],
        vec![],
        Duration::from_millis(10),
        Arc::new(DenyAllApprovals),
    );
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor.execute(&call("slow", json!({})), &mut ctx).await.unwrap();

    assert!(outcome.output.is_error);
}

#[tokio::test]
async fn test_sandbox_violation_is_denied_when_deny_list_also_matches() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let executor = ToolExecutor::new(
        registry,
        vec![],
        vec!["echo".to_string()],
        Duration::from_secs(5),
        Arc::new(DenyAllApprovals),
    )
    .with_sandbox(
        lace_config::SandboxConfig {
            enabled: true,
            allowed_paths: vec![],
        },
        std::env::temp_dir(),
    );
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"path": "/etc/passwd"})), &mut ctx)
        .await
        .unwrap();

    assert!(outcome.output.is_error);
    assert!(outcome.approval.is_none());
}

#[tokio::test]
async fn test_sandbox_violation_forces_an_approval_round_trip() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let callback = Arc::new(CountingApproval {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::AllowOnce,
    });
    let executor = ToolExecutor::new(
        registry,
        vec!["echo".to_string()],
        vec![],
        Duration::from_secs(5),
        callback.clone(),
    )
    .with_sandbox(
        lace_config::SandboxConfig {
            enabled: true,
            allowed_paths: vec![],
        },
        std::env::temp_dir(),
    );
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(&call("echo", json!({"path": "/etc/passwd"})), &mut ctx)
        .await
        .unwrap();

    assert!(!outcome.output.is_error);
    assert_eq!(callback.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_path_inside_cwd_is_unaffected_by_the_sandbox() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::destructive(),
    });
    let cwd = std::env::temp_dir();
    let executor = ToolExecutor::new(
        registry,
        vec!["echo".to_string()],
        vec![],
        Duration::from_secs(5),
        Arc::new(DenyAllApprovals),
    )
    .with_sandbox(
        lace_config::SandboxConfig {
            enabled: true,
            allowed_paths: vec![],
        },
        cwd.clone(),
    );
    let mut ctx = ToolContext::new("call-1", "session-1");

    let outcome = executor
        .execute(
            &call("echo", json!({"path": cwd.join("notes.txt").to_string_lossy()})),
            &mut ctx,
        )
        .await
        .unwrap();

    assert!(!outcome.output.is_error);
}

#[tokio::test]
async fn test_already_cancelled_context_is_a_propagating_error() {
    let registry = registry_with(EchoTool {
        annotations: ToolAnnotations::readonly(),
    });
    let executor = executor_with(registry, vec![], vec![], Arc::new(DenyAllApprovals));
    let mut ctx = ToolContext::new("call-1", "session-1");
    ctx.cancel_token.cancel();

    let result = executor.execute(&call("echo", json!({"text": "hi"})), &mut ctx).await;

    assert!(matches!(result, Err(ToolError::Cancelled { .. })));
}
