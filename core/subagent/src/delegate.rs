//! `delegate`: the first-class tool that spawns a child agent to work a
//! sub-task to completion and hands its final message back as this call's
//! result.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use lace_config::RetryConfig;
use lace_config::TokenBudgetConfig;
use lace_context::BudgetManager;
use lace_loop::Agent;
use lace_loop::CompactionStrategy;
use lace_loop::LoopEvent;
use lace_loop::TurnOutcome;
use lace_protocol::ThreadId;
use lace_protocol::ToolOutput;
use lace_provider::Provider;
use lace_store::ThreadStore;
use lace_tools::Tool;
use lace_tools::ToolAnnotations;
use lace_tools::ToolContext;
use lace_tools::ToolError;
use lace_tools::ToolExecutor;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use tracing::info;

use crate::allocator::ChildThreadAllocator;

/// Input to the `delegate` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct DelegateInput {
    /// The task description handed to the child agent as its first user
    /// message.
    pub task: String,
    /// Requested model for the child agent.
    ///
    /// Accepted for forward compatibility with a multi-model provider
    /// layer; this runtime has a single [`Provider`] per session, so a
    /// request here is a no-op today.
    #[serde(default)]
    pub model: Option<String>,
}

/// Builds the [`ToolExecutor`] a child agent at `thread_id` should run
/// with. Implementations typically register the same base tool set as
/// the parent plus a `delegate` tool of their own, bound to `thread_id`,
/// so delegation nests.
pub type ExecutorFactory = Arc<dyn Fn(ThreadId) -> Arc<ToolExecutor> + Send + Sync>;

/// Where a child agent's [`LoopEvent`]s go. Swapped out (not just read)
/// by [`crate::allocator::ChildThreadAllocator`]'s caller whenever a new
/// subscriber attaches, so every agent in a session's tree always
/// forwards into whichever sink is current.
pub type EventSink = Arc<Mutex<Option<tokio::sync::mpsc::UnboundedSender<LoopEvent>>>>;

/// Build an [`EventSink`] with nothing subscribed yet.
pub fn empty_event_sink() -> EventSink {
    Arc::new(Mutex::new(None))
}

/// Spawn a task forwarding every event `rx` receives into whatever sink
/// `sink` currently points at. Exits once the sending half (the agent
/// being subscribed to) is dropped.
fn forward_into(mut rx: tokio::sync::mpsc::UnboundedReceiver<LoopEvent>, sink: EventSink) {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            #[allow(clippy::unwrap_used)]
            let current = sink.lock().unwrap().clone();
            if let Some(tx) = current {
                let _ = tx.send(event);
            }
        }
    });
}

/// Spawns a child agent under the calling agent's thread and runs it to
/// completion, synchronously, within one call.
pub struct DelegateTool {
    parent_thread: ThreadId,
    session_id: String,
    store: Arc<dyn ThreadStore>,
    provider: Arc<dyn Provider>,
    compaction: Arc<dyn CompactionStrategy>,
    budget: TokenBudgetConfig,
    retry: RetryConfig,
    max_depth: u32,
    allocator: Arc<ChildThreadAllocator>,
    executor_factory: ExecutorFactory,
    event_sink: EventSink,
}

impl DelegateTool {
    /// Build a `delegate` tool bound to `parent_thread`: every call
    /// allocates a fresh child under that thread.
    ///
    /// `event_sink` is the session-wide fan-out point: every child this
    /// tool spawns has its [`LoopEvent`] stream forwarded into it, so a
    /// subscriber attached via `event_sink` sees progress from anywhere
    /// in the delegation tree, not just the root agent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        parent_thread: ThreadId,
        session_id: impl Into<String>,
        store: Arc<dyn ThreadStore>,
        provider: Arc<dyn Provider>,
        compaction: Arc<dyn CompactionStrategy>,
        budget: TokenBudgetConfig,
        retry: RetryConfig,
        max_depth: u32,
        allocator: Arc<ChildThreadAllocator>,
        executor_factory: ExecutorFactory,
        event_sink: EventSink,
    ) -> Self {
        Self {
            parent_thread,
            session_id: session_id.into(),
            store,
            provider,
            compaction,
            budget,
            retry,
            max_depth,
            allocator,
            executor_factory,
            event_sink,
        }
    }
}

#[async_trait]
impl Tool for DelegateTool {
    fn name(&self) -> &str {
        "delegate"
    }

    fn description(&self) -> &str {
        "Delegate a sub-task to a new child agent and wait for its result."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["task"],
            "properties": {
                "task": {"type": "string"},
                "model": {"type": "string"},
            },
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations {
            destructive: false,
            readonly: false,
            idempotent: false,
        }
    }

    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let input: DelegateInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(err) => return Ok(ToolOutput::error(format!("invalid delegate input: {err}"))),
        };

        let child_depth = self.parent_thread.depth() + 1;
        if child_depth > self.max_depth {
            return Ok(ToolOutput::error(format!(
                "delegation depth limit ({}) exceeded at {}",
                self.max_depth, self.parent_thread
            )));
        }

        let child_thread = self.allocator.allocate(&self.parent_thread);
        info!(%child_thread, parent = %self.parent_thread, "spawning delegated agent");

        let child_executor = (self.executor_factory)(child_thread.clone());
        let child_budget = BudgetManager::new(
            self.budget.limit,
            self.budget.warning_threshold,
            self.budget.reserve,
        );

        let mut child = Agent::with_parent_cancellation(
            child_thread.clone(),
            self.session_id.clone(),
            self.store.clone(),
            self.provider.clone(),
            child_executor,
            self.compaction.clone(),
            child_budget,
            self.retry,
            ctx.cancel_token.clone(),
        );

        forward_into(child.subscribe(), self.event_sink.clone());

        let outcome = child.send_message(&input.task).await;

        Ok(match outcome {
            Ok(TurnOutcome::Completed { text, .. }) => ToolOutput::text(text),
            Ok(TurnOutcome::Stopped) => {
                ToolOutput::error(format!("delegated agent {child_thread} was stopped before completing"))
            }
            Ok(TurnOutcome::Error { message }) => {
                ToolOutput::error(format!("delegated agent {child_thread} failed: {message}"))
            }
            Err(source) => ToolOutput::error(format!("delegated agent {child_thread} failed: {source}")),
        })
    }
}

#[cfg(test)]
#[path = "delegate.test.rs"]
mod tests;
