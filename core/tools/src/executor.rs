//! The tool executor: resolves a call against the registry, arbitrates
//! approval, runs the tool under a timeout, and normalizes the result.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use lace_protocol::ApprovalDecision;
use lace_protocol::ApprovalRequest;
use lace_protocol::RiskLevel;
use lace_protocol::ToolOutput;
use lace_protocol::ValidationResult;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::arbitration::ArbitrationOutcome;
use crate::arbitration::Arbitrator;
use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolRegistry;
use crate::risk::classify_risk;
use crate::sandbox::PathSandbox;
use crate::sandbox::SandboxOutcome;

/// A validated tool call ready to execute. Distinct from
/// [`lace_protocol::EventData::ToolCall`]: that's the persisted record,
/// this is the executor's input.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

/// The approval request/decision pair the executor produced for one
/// call, for the caller to persist as
/// `TOOL_APPROVAL_REQUEST`/`TOOL_APPROVAL_RESPONSE` events.
#[derive(Debug, Clone)]
pub struct ApprovalRecord {
    pub request: ApprovalRequest,
    pub decision: ApprovalDecision,
}

/// Result of running one call through the executor.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// The normalized result, destined for a `TOOL_RESULT` event.
    pub output: ToolOutput,
    /// Set whenever arbitration needed a round-trip to the approval
    /// callback, whatever the decision.
    pub approval: Option<ApprovalRecord>,
    /// Set when the decision was [`ApprovalDecision::Stop`]: the caller
    /// must persist `output`/`approval` as usual, then halt the agent
    /// loop rather than continue to the next turn.
    pub halt: bool,
}

/// Asks whatever is driving the session (a human, or an automated
/// policy) to resolve a pending approval.
#[async_trait]
pub trait ApprovalCallback: Send + Sync {
    async fn request_approval(&self, request: ApprovalRequest) -> ApprovalDecision;
}

/// An [`ApprovalCallback`] that denies everything without prompting,
/// useful for headless runs with a strict auto-approve/deny policy and
/// nothing left that should ever need a human.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllApprovals;

#[async_trait]
impl ApprovalCallback for DenyAllApprovals {
    async fn request_approval(&self, _request: ApprovalRequest) -> ApprovalDecision {
        ApprovalDecision::Deny
    }
}

/// Runs calls against a registered tool inventory.
pub struct ToolExecutor {
    registry: ToolRegistry,
    arbitrator: Arbitrator,
    approval_callback: std::sync::Arc<dyn ApprovalCallback>,
    session_approvals: Mutex<HashSet<String>>,
    timeout: Duration,
    sandbox: Option<PathSandbox>,
}

impl ToolExecutor {
    /// Build an executor over `registry`, with auto-approve/deny lists,
    /// a per-call timeout, and the callback to consult when neither list
    /// settles the decision.
    pub fn new(
        registry: ToolRegistry,
        auto_approve: Vec<String>,
        deny_list: Vec<String>,
        timeout: Duration,
        approval_callback: std::sync::Arc<dyn ApprovalCallback>,
    ) -> Self {
        Self {
            registry,
            arbitrator: Arbitrator::new(auto_approve, deny_list),
            approval_callback,
            session_approvals: Mutex::new(HashSet::new()),
            timeout,
            sandbox: None,
        }
    }

    /// Enforce `config` against a write-class call's target path,
    /// resolved relative to `cwd`. Without this, calls run unsandboxed.
    #[must_use]
    pub fn with_sandbox(mut self, config: lace_config::SandboxConfig, cwd: std::path::PathBuf) -> Self {
        self.sandbox = Some(PathSandbox::new(config, cwd));
        self
    }

    /// The tool inventory this executor resolves calls against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one call through validate -> arbitrate -> execute ->
    /// post-process -> cleanup.
    ///
    /// Only [`ToolError::Cancelled`] escapes as `Err`: every other
    /// failure (unknown tool, invalid input, denial, a failing tool
    /// body) is converted into a failed [`ToolOutput`] inside
    /// [`ExecutionOutcome::output`] so the model can see and react to it.
    pub async fn execute(
        &self,
        call: &ToolCall,
        ctx: &mut ToolContext,
    ) -> Result<ExecutionOutcome, ToolError> {
        if ctx.is_cancelled() {
            return Err(crate::error::tool_error::CancelledSnafu.build());
        }

        let Some(tool) = self.registry.get(&call.name) else {
            return Ok(ExecutionOutcome {
                output: ToolOutput::error(format!("unknown tool: {}", call.name)),
                approval: None,
                halt: false,
            });
        };

        if let ValidationResult::Invalid { errors } = tool.validate(&call.arguments).await {
            let message = errors
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Ok(ExecutionOutcome {
                output: ToolOutput::error(message),
                approval: None,
                halt: false,
            });
        }

        let annotations = tool.annotations();
        let risk = classify_risk(&call.name, &call.arguments);

        let sandbox_violation = self
            .sandbox
            .as_ref()
            .and_then(|sandbox| match sandbox.check(annotations.destructive, &call.arguments) {
                SandboxOutcome::Allow => None,
                SandboxOutcome::Violation { reason } => Some(reason),
            });

        let already_approved = self.session_approvals.lock().await.contains(&call.name);
        let mut approval = None;
        if !already_approved || sandbox_violation.is_some() {
            let arbitration = if already_approved {
                ArbitrationOutcome::Allow
            } else {
                self.arbitrator
                    .arbitrate(&call.name, annotations.destructive, risk)
            };
            let arbitration = match (&sandbox_violation, arbitration) {
                (Some(_), ArbitrationOutcome::Deny) => ArbitrationOutcome::Deny,
                (Some(_), _) => ArbitrationOutcome::NeedsApproval,
                (None, outcome) => outcome,
            };
            match arbitration {
                ArbitrationOutcome::Allow => {}
                ArbitrationOutcome::Deny => {
                    return Ok(ExecutionOutcome {
                        output: ToolOutput::error(format!("denied by policy: {}", call.name)),
                        approval: None,
                        halt: false,
                    });
                }
                ArbitrationOutcome::NeedsApproval => {
                    let request = describe_request(call, risk, sandbox_violation.as_deref());
                    ctx.notify_approval_requested(&request);
                    let decision = self
                        .approval_callback
                        .request_approval(request.clone())
                        .await;
                    approval = Some(ApprovalRecord {
                        request,
                        decision,
                    });

                    if decision.is_stop() {
                        return Ok(ExecutionOutcome {
                            output: ToolOutput::error("stopped by user"),
                            approval,
                            halt: true,
                        });
                    }
                    if !decision.is_allowed() {
                        return Ok(ExecutionOutcome {
                            output: ToolOutput::error("denied by user"),
                            approval,
                            halt: false,
                        });
                    }
                    if decision == ApprovalDecision::AllowSession {
                        self.session_approvals
                            .lock()
                            .await
                            .insert(call.name.clone());
                    }
                }
            }
        }

        let output = self.run_with_timeout(&*tool, call.arguments.clone(), ctx).await;
        let output = match output {
            Ok(output) => tool.post_process(output, ctx).await,
            Err(err) if err.halts_loop() => {
                tool.cleanup(ctx).await;
                return Err(err);
            }
            Err(err) => ToolOutput::error(err.to_string()),
        };

        tool.cleanup(ctx).await;

        Ok(ExecutionOutcome {
            output,
            approval,
            halt: false,
        })
    }

    async fn run_with_timeout(
        &self,
        tool: &(dyn crate::tool::Tool),
        input: Value,
        ctx: &mut ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        match tokio::time::timeout(self.timeout, tool.execute(input, ctx)).await {
            Ok(result) => result,
            Err(_) => Ok(ToolOutput::error(format!(
                "timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

fn describe_request(call: &ToolCall, risk: RiskLevel, sandbox_violation: Option<&str>) -> ApprovalRequest {
    let message = match sandbox_violation {
        Some(reason) => format!("{} requires approval to expand the sandbox: {reason}", call.name),
        None => format!("{} requires approval (risk: {risk:?})", call.name),
    };
    ApprovalRequest::new(call.call_id.clone(), call.name.clone(), risk, message)
}

#[cfg(test)]
#[path = "executor.test.rs"]
mod tests;
