//! [`Session`]: the owning scope for a tree of agents, one tool inventory,
//! and one approval policy.
//!
//! A session owns exactly one **root agent**. Every `delegate` tool call
//! anywhere in the tree spawns a **child agent** under a fresh `.N` thread
//! id, sharing this session's store, provider, compaction strategy, and
//! approval routing — see `lace-subagent` for the mechanics and §4.7 of
//! the design for the contract. The session itself never touches a child
//! agent directly once `delegate` hands it off: children run to
//! completion inside the tool call and are dropped, leaving only their
//! thread's event log (and the allocator's record of their thread id)
//! behind.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lace_config::Config;
use lace_context::BudgetManager;
use lace_loop::Agent;
use lace_loop::CompactionStrategy;
use lace_loop::LoopEvent;
use lace_loop::SummarizeWithModel;
use lace_loop::TurnOutcome;
use lace_protocol::ThreadId;
use lace_provider::Provider;
use lace_store::ThreadStore;
use lace_subagent::ChildThreadAllocator;
use lace_subagent::DelegateTool;
use lace_subagent::EventSink;
use lace_subagent::ExecutorFactory;
use lace_subagent::empty_event_sink;
use lace_tools::ApprovalCallback;
use lace_tools::ToolExecutor;
use lace_tools::ToolRegistry;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::approval::SessionApprovalCallback;
use crate::error::SessionError;
use crate::error::session_error;

/// Builds the base tool set (everything but `delegate`, which the session
/// registers itself, bound to each thread) every agent in the session
/// should run with.
///
/// Called once per thread in the tree, so it must return a fresh
/// [`ToolRegistry`] each time rather than a shared one.
pub type ToolRegistryFactory = Arc<dyn Fn() -> ToolRegistry + Send + Sync>;

/// Owning scope for a tree of agents: one root thread, an approval
/// policy, and a tool inventory shared by every agent `delegate` spawns.
pub struct Session {
    id: String,
    project: PathBuf,
    config: Config,
    allocator: Arc<ChildThreadAllocator>,
    cancel_token: CancellationToken,
    root_agent: Agent,
    event_sink: EventSink,
}

impl Session {
    /// Start a new session rooted at a fresh thread.
    ///
    /// `tool_registry_factory` supplies the tool set every agent in the
    /// tree runs with (minus `delegate`, which this constructor wires in
    /// per thread). `approval_callback` is the inner human/UI/policy
    /// callback; it is wrapped in a session-wide cache (see
    /// [`SessionApprovalCallback`]) so an `allow_session` decision made by
    /// one agent in the tree holds for the rest of it.
    pub fn new(
        project: PathBuf,
        store: Arc<dyn ThreadStore>,
        provider: Arc<dyn Provider>,
        config: Config,
        tool_registry_factory: ToolRegistryFactory,
        approval_callback: Arc<dyn ApprovalCallback>,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let root_thread_id = ThreadId::new_root();
        let approval: Arc<dyn ApprovalCallback> =
            Arc::new(SessionApprovalCallback::new(approval_callback));
        let allocator = Arc::new(ChildThreadAllocator::new());
        let compaction: Arc<dyn CompactionStrategy> =
            Arc::new(SummarizeWithModel::new(provider.clone()));
        let cancel_token = CancellationToken::new();
        let event_sink = empty_event_sink();

        let executor_factory = build_executor_factory(
            id.clone(),
            project.clone(),
            store.clone(),
            provider.clone(),
            compaction.clone(),
            config.clone(),
            allocator.clone(),
            approval,
            tool_registry_factory,
            event_sink.clone(),
        );

        let root_executor = executor_factory(root_thread_id.clone());
        let budget = BudgetManager::new(
            config.token_budget.limit,
            config.token_budget.warning_threshold,
            config.token_budget.reserve,
        );

        info!(session_id = %id, thread_id = %root_thread_id, "starting session");

        let mut root_agent = Agent::with_parent_cancellation(
            root_thread_id,
            id.clone(),
            store,
            provider,
            root_executor,
            compaction,
            budget,
            config.retry,
            cancel_token.clone(),
        );

        forward_into(root_agent.subscribe(), event_sink.clone());

        Self {
            id,
            project,
            config,
            allocator,
            cancel_token,
            root_agent,
            event_sink,
        }
    }

    /// Session id (shared by every agent in the tree via `ToolContext`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Working directory / project root this session was opened for.
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// The root thread id. Every other thread in the tree descends from
    /// this one (see [`ThreadId::is_descendant_of`]).
    pub fn root_thread_id(&self) -> &ThreadId {
        self.root_agent.thread_id()
    }

    /// Resolved configuration this session was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one turn on the root agent.
    ///
    /// Any `delegate` calls the root agent's turn makes run their child
    /// agents to completion before this returns.
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        self.root_agent
            .send_message(text)
            .await
            .context(session_error::TurnSnafu)
    }

    /// Every thread id spawned by delegation anywhere in the tree so far,
    /// at any depth, in allocation order.
    pub fn child_threads(&self) -> Vec<ThreadId> {
        let mut frontier = vec![self.root_agent.thread_id().clone()];
        let mut all = Vec::new();
        while let Some(thread_id) = frontier.pop() {
            let children = self.allocator.children_of(&thread_id);
            frontier.extend(children.iter().cloned());
            all.extend(children);
        }
        all
    }

    /// Cancel the session: the root agent's in-flight turn stops, and so
    /// does any currently running delegated child, since a child's
    /// cancellation token descends from the tool call context's, which
    /// descends from this session's token. A child's own cancellation
    /// never propagates back up, so cancelling one child never affects
    /// its siblings or the parent.
    pub fn cancel(&self) {
        info!(session_id = %self.id, "cancelling session");
        self.cancel_token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Subscribe to this session's events: the root agent's, and every
    /// delegated child's anywhere in the tree, present and future.
    ///
    /// Replaces any previous subscriber, mirroring [`Agent::subscribe`] —
    /// only one listener is supported at a time.
    pub fn subscribe(&self) -> tokio::sync::mpsc::UnboundedReceiver<LoopEvent> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        #[allow(clippy::unwrap_used)]
        {
            *self.event_sink.lock().unwrap() = Some(tx);
        }
        rx
    }
}

/// Spawn a task forwarding every event `rx` receives into whatever sink
/// `sink` currently points at. Exits once the sending half is dropped.
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

#[allow(clippy::too_many_arguments)]
fn build_executor_factory(
    session_id: String,
    project: PathBuf,
    store: Arc<dyn ThreadStore>,
    provider: Arc<dyn Provider>,
    compaction: Arc<dyn CompactionStrategy>,
    config: Config,
    allocator: Arc<ChildThreadAllocator>,
    approval: Arc<dyn ApprovalCallback>,
    tool_registry_factory: ToolRegistryFactory,
    event_sink: EventSink,
) -> ExecutorFactory {
    Arc::new(move |thread_id: ThreadId| {
        build_executor_for(
            thread_id,
            session_id.clone(),
            project.clone(),
            store.clone(),
            provider.clone(),
            compaction.clone(),
            config.clone(),
            allocator.clone(),
            approval.clone(),
            tool_registry_factory.clone(),
            event_sink.clone(),
        )
    })
}

/// Builds the [`ToolExecutor`] one thread in the tree should run with:
/// the session's base tool set plus a `delegate` tool bound to
/// `thread_id`, wired with a factory that repeats this for its own
/// children.
#[allow(clippy::too_many_arguments)]
fn build_executor_for(
    thread_id: ThreadId,
    session_id: String,
    project: PathBuf,
    store: Arc<dyn ThreadStore>,
    provider: Arc<dyn Provider>,
    compaction: Arc<dyn CompactionStrategy>,
    config: Config,
    allocator: Arc<ChildThreadAllocator>,
    approval: Arc<dyn ApprovalCallback>,
    tool_registry_factory: ToolRegistryFactory,
    event_sink: EventSink,
) -> Arc<ToolExecutor> {
    let mut registry = tool_registry_factory();

    let nested_factory = build_executor_factory(
        session_id.clone(),
        project.clone(),
        store.clone(),
        provider.clone(),
        compaction.clone(),
        config.clone(),
        allocator.clone(),
        approval.clone(),
        tool_registry_factory,
        event_sink.clone(),
    );

    registry.register(DelegateTool::new(
        thread_id,
        session_id,
        store.clone(),
        provider.clone(),
        compaction.clone(),
        config.token_budget,
        config.retry,
        config.delegation.max_depth,
        allocator,
        nested_factory,
        event_sink,
    ));

    Arc::new(
        ToolExecutor::new(
            registry,
            config.tools.auto_approve.clone(),
            config.tools.deny_list.clone(),
            Duration::from_millis(config.tools.timeout_ms),
            approval,
        )
        .with_sandbox(config.sandbox.clone(), project),
    )
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
