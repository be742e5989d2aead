//! The per-turn agent loop: drives one thread through
//! `sendMessage` -> provider stream -> (tool execution)* -> idle.

use std::collections::HashMap;
use std::sync::Arc;

use lace_config::RetryConfig;
use lace_context::BudgetManager;
use lace_context::estimate_tokens;
use lace_error::ErrorExt;
use lace_message::AssembleOptions;
use lace_message::assemble_prompt;
use lace_protocol::AgentState;
use lace_protocol::EventData;
use lace_protocol::ThreadId;
use lace_protocol::ToolStatus;
use lace_provider::CompleteOptions;
use lace_provider::FinishReason;
use lace_provider::Provider;
use lace_provider::ProviderEvent;
use lace_store::ThreadStore;
use lace_tools::ToolCall as ExecutorToolCall;
use lace_tools::ToolContext;
use lace_tools::ToolExecutor;
use snafu::ResultExt;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing::warn;

use crate::compaction::CompactionStrategy;
use crate::error::LoopError;
use crate::error::loop_error;
use crate::event::LoopEvent;

/// How one call to [`Agent::send_message`] ended.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The turn ran to `end_turn` or `max_tokens`.
    Completed {
        /// Final assistant text for the last sub-turn, if any.
        text: String,
        /// Set when the provider stopped on `max_tokens`.
        truncated: bool,
    },
    /// The turn was stopped: a `stop` approval decision, or the caller's
    /// per-turn cancellation token fired.
    Stopped,
    /// Retries were exhausted or the failure wasn't retryable.
    Error {
        /// Message recorded on the `LOCAL_SYSTEM_MESSAGE` event.
        message: String,
    },
}

/// Drives one thread's turns: constructs prompts, opens provider streams,
/// persists events, and executes tool calls until the model stops asking
/// for one.
///
/// `shutdown_token` is permanent: once cancelled, the agent never accepts
/// another `send_message`. `turn_token` is replaced fresh on every call,
/// derived as a child of `shutdown_token`, so a caller can cancel just
/// the in-flight turn (returning to [`AgentState::Idle`]) without tearing
/// down the agent itself.
pub struct Agent {
    thread_id: ThreadId,
    state: AgentState,
    store: Arc<dyn ThreadStore>,
    provider: Arc<dyn Provider>,
    executor: Arc<ToolExecutor>,
    budget: BudgetManager,
    compaction: Arc<dyn CompactionStrategy>,
    retry: RetryConfig,
    shutdown_token: CancellationToken,
    turn_token: CancellationToken,
    session_id: String,
    events_tx: Option<tokio::sync::mpsc::UnboundedSender<LoopEvent>>,
}

impl Agent {
    /// Build an agent over an existing (possibly empty) thread.
    ///
    /// `budget` is the caller's responsibility to construct: pass
    /// [`BudgetManager::from_events`] when resuming a thread that already
    /// has history, so accounting survives a cold start.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        thread_id: ThreadId,
        session_id: impl Into<String>,
        store: Arc<dyn ThreadStore>,
        provider: Arc<dyn Provider>,
        executor: Arc<ToolExecutor>,
        compaction: Arc<dyn CompactionStrategy>,
        budget: BudgetManager,
        retry: RetryConfig,
    ) -> Self {
        Self::with_parent_cancellation(
            thread_id,
            session_id,
            store,
            provider,
            executor,
            compaction,
            budget,
            retry,
            CancellationToken::new(),
        )
    }

    /// Build an agent whose `shutdown_token` is a child of `parent_token`,
    /// so cancelling `parent_token` tears this agent down too.
    ///
    /// Used by delegation: a child agent's shutdown token descends from
    /// the tool call context's cancellation token, which itself descends
    /// from the delegating agent's turn token, so cancelling a parent's
    /// turn cancels every in-flight child.
    #[allow(clippy::too_many_arguments)]
    pub fn with_parent_cancellation(
        thread_id: ThreadId,
        session_id: impl Into<String>,
        store: Arc<dyn ThreadStore>,
        provider: Arc<dyn Provider>,
        executor: Arc<ToolExecutor>,
        compaction: Arc<dyn CompactionStrategy>,
        budget: BudgetManager,
        retry: RetryConfig,
        parent_token: CancellationToken,
    ) -> Self {
        Self {
            thread_id,
            state: AgentState::Idle,
            store,
            provider,
            executor,
            budget,
            compaction,
            retry,
            shutdown_token: parent_token.child_token(),
            turn_token: CancellationToken::new(),
            session_id: session_id.into(),
            events_tx: None,
        }
    }

    /// Subscribe to this agent's [`LoopEvent`] notifications. Replaces
    /// any previous subscriber: only one listener is supported at a time.
    pub fn subscribe(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<LoopEvent> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        self.events_tx = Some(tx);
        rx
    }

    /// Current state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// The thread this agent drives.
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Current budget snapshot.
    pub fn budget_status(&self) -> lace_context::BudgetStatus {
        self.budget.status()
    }

    /// Request cancellation of just the in-flight turn. A no-op if the
    /// agent is idle.
    pub fn cancel_turn(&self) {
        self.turn_token.cancel();
    }

    /// Request permanent shutdown: the in-flight turn (if any) is
    /// cancelled and no further `send_message` calls will be accepted.
    ///
    /// Reaches the terminal `stopped` state directly: nothing in this
    /// implementation awaits between a `shutdown` call and the agent
    /// actually going quiescent, so there is no separate drain to wait on.
    pub fn shutdown(&mut self) {
        self.shutdown_token.cancel();
        self.turn_token.cancel();
        self.state = AgentState::Stopping;
        self.state = AgentState::Stopped;
    }

    fn emit(&self, event: LoopEvent) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(event);
        }
    }

    /// Abandon the in-flight turn on `turn_token` cancellation: passes
    /// through `stopping` before settling back to `idle`, since the agent
    /// itself stays usable (only `shutdown` reaches the terminal
    /// `stopped` state). Draining is instantaneous here: there is no
    /// in-flight work left to await once this is called.
    fn stop_turn(&mut self) -> TurnOutcome {
        self.state = AgentState::Stopping;
        self.state = AgentState::Idle;
        self.emit(LoopEvent::Stopped);
        TurnOutcome::Stopped
    }

    /// Accept one user message and run turns until the agent is idle,
    /// stopped, or errors.
    ///
    /// Returns [`LoopError::Busy`] if the agent isn't currently
    /// [`AgentState::Idle`].
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, LoopError> {
        if !self.state.accepts_input() {
            return loop_error::BusySnafu {
                state: state_name(self.state),
            }
            .fail();
        }
        if self.shutdown_token.is_cancelled() {
            return loop_error::BusySnafu { state: "stopped" }.fail();
        }

        self.turn_token = self.shutdown_token.child_token();

        self.store
            .append(&self.thread_id, EventData::UserMessage { text: text.to_string() })
            .context(loop_error::StoreSnafu)?;

        self.emit(LoopEvent::TurnStarted {
            thread_id: self.thread_id.clone(),
        });

        loop {
            if self.turn_token.is_cancelled() {
                return Ok(self.stop_turn());
            }

            if self.budget.status().near_limit {
                self.run_compaction().await?;
            }

            match self.run_one_turn().await? {
                TurnStep::Continue => continue,
                TurnStep::Outcome(outcome) => return Ok(outcome),
            }
        }
    }

    async fn run_compaction(&mut self) -> Result<(), LoopError> {
        self.emit(LoopEvent::CompactionStarted);
        let events = self
            .store
            .events(&self.thread_id)
            .context(loop_error::StoreSnafu)?;
        let before = self.budget.status().total;
        let replacement = self
            .compaction
            .compact(&events)
            .await?;
        let last_idx = events.len().saturating_sub(1);
        self.store
            .compact(
                &self.thread_id,
                self.compaction.strategy_id(),
                last_idx,
                replacement.clone(),
            )
            .context(loop_error::StoreSnafu)?;
        self.budget.handle_compaction(&replacement);
        let after = self.budget.status().total;
        self.emit(LoopEvent::CompactionCompleted {
            tokens_saved: before.saturating_sub(after),
        });
        Ok(())
    }

    fn assemble_current_prompt(&self) -> Result<Vec<lace_provider::Message>, LoopError> {
        let events = self
            .store
            .events(&self.thread_id)
            .context(loop_error::StoreSnafu)?;
        Ok(assemble_prompt(&events, &AssembleOptions::default()))
    }

    async fn run_one_turn(&mut self) -> Result<TurnStep, LoopError> {
        self.state = AgentState::Thinking;

        let mut messages = self.assemble_current_prompt()?;
        let tools = self.executor.registry().to_specs();

        if !self.budget.can_request(estimate_prompt_tokens(&messages)) {
            self.run_compaction().await?;
            messages = self.assemble_current_prompt()?;
        }

        let mut attempt = 0;
        loop {
            let mut stream = self
                .open_stream_with_retry(messages.clone(), tools.clone())
                .await?;

            let mut pending_names: HashMap<String, String> = HashMap::new();
            let mut queued_calls: Vec<ExecutorToolCall> = Vec::new();
            let mut seen_call_ids: std::collections::HashSet<String> =
                std::collections::HashSet::new();
            let mut buffer = String::new();
            let mut turn_usage = lace_protocol::TokenUsage::default();
            let mut finish: Option<FinishReason> = None;

            while let Some(event) = stream.next().await {
                if self.turn_token.is_cancelled() {
                    drop(stream);
                    return Ok(TurnStep::Outcome(self.stop_turn()));
                }

                match event {
                    ProviderEvent::TextDelta(delta) => {
                        self.state = AgentState::Streaming;
                        buffer.push_str(&delta);
                        self.emit(LoopEvent::TextDelta { delta });
                    }
                    ProviderEvent::ThinkingDelta(delta) => {
                        self.store
                            .append(
                                &self.thread_id,
                                EventData::AgentThinking { text: delta.clone() },
                            )
                            .context(loop_error::StoreSnafu)?;
                        self.emit(LoopEvent::ThinkingDelta { delta });
                    }
                    ProviderEvent::ToolCallStart { call_id, name } => {
                        pending_names.insert(call_id, name);
                    }
                    ProviderEvent::ToolCallArgsDelta { .. } => {}
                    ProviderEvent::ToolCallEnd { call_id, args } => {
                        if !seen_call_ids.insert(call_id.clone()) {
                            warn!(call_id, "duplicate tool call id within a turn, dropping");
                            continue;
                        }
                        let Some(name) = pending_names.remove(&call_id) else {
                            warn!(call_id, "tool call end with no matching start, dropping");
                            continue;
                        };
                        self.store
                            .append(
                                &self.thread_id,
                                EventData::ToolCall {
                                    call_id: call_id.clone(),
                                    name: name.clone(),
                                    arguments: args.clone(),
                                },
                            )
                            .context(loop_error::StoreSnafu)?;
                        self.emit(LoopEvent::ToolCallStarted {
                            call_id: call_id.clone(),
                            name: name.clone(),
                        });
                        queued_calls.push(ExecutorToolCall {
                            call_id,
                            name,
                            arguments: args,
                        });
                    }
                    ProviderEvent::Usage(usage) => {
                        turn_usage = turn_usage.add(usage);
                        self.budget.record(usage);
                    }
                    ProviderEvent::Finish(reason) => {
                        finish = Some(reason);
                        break;
                    }
                }
            }

            let Some(reason) = finish else {
                return Ok(TurnStep::Outcome(TurnOutcome::Error {
                    message: "provider stream ended without a finish event".to_string(),
                }));
            };

            if turn_usage == lace_protocol::TokenUsage::default() && !reason.is_error() {
                let prompt_estimate = estimate_prompt_tokens(&messages);
                let completion_estimate = estimate_tokens(&buffer);
                turn_usage = lace_protocol::TokenUsage::new(
                    prompt_estimate as i64,
                    completion_estimate as i64,
                    (prompt_estimate + completion_estimate) as i64,
                );
                self.budget.record(turn_usage);
            }

            if reason.is_error() {
                attempt += 1;
                if attempt > self.retry.max_attempts {
                    return self.fail_turn().await;
                }
                let delay_ms = self.retry.base_backoff_ms * 2u64.pow(attempt - 1);
                self.emit(LoopEvent::Retry { attempt, delay_ms });
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                continue;
            }

            return match reason {
                FinishReason::EndTurn => {
                    self.flush_text(&mut buffer, turn_usage, false)?;
                    self.state = AgentState::Idle;
                    self.emit(LoopEvent::TurnCompleted { truncated: false });
                    Ok(TurnStep::Outcome(TurnOutcome::Completed {
                        text: buffer,
                        truncated: false,
                    }))
                }
                FinishReason::MaxTokens => {
                    self.flush_text(&mut buffer, turn_usage, true)?;
                    self.run_compaction().await?;
                    self.state = AgentState::Idle;
                    self.emit(LoopEvent::TurnCompleted { truncated: true });
                    Ok(TurnStep::Outcome(TurnOutcome::Completed {
                        text: buffer,
                        truncated: true,
                    }))
                }
                FinishReason::StopSequence => {
                    self.flush_text(&mut buffer, turn_usage, false)?;
                    self.state = AgentState::Idle;
                    self.emit(LoopEvent::TurnCompleted { truncated: false });
                    Ok(TurnStep::Outcome(TurnOutcome::Completed {
                        text: buffer,
                        truncated: false,
                    }))
                }
                FinishReason::ToolUse => {
                    self.flush_text(&mut buffer, turn_usage, false)?;
                    self.state = AgentState::AwaitingTool;
                    match self.run_tool_calls(queued_calls).await? {
                        ToolRunOutcome::Continue => Ok(TurnStep::Continue),
                        ToolRunOutcome::Halted => Ok(TurnStep::Outcome(self.stop_turn())),
                    }
                }
                FinishReason::Error => unreachable!("handled above via is_error"),
            };
        }
    }

    async fn fail_turn(&mut self) -> Result<TurnStep, LoopError> {
        let message = "provider stream failed and retries were exhausted".to_string();
        self.store
            .append(
                &self.thread_id,
                EventData::LocalSystemMessage {
                    text: message.clone(),
                },
            )
            .context(loop_error::StoreSnafu)?;
        self.state = AgentState::Error;
        self.emit(LoopEvent::Error {
            message: message.clone(),
        });
        info!(thread_id = %self.thread_id, "agent entered error state after exhausting retries");
        Ok(TurnStep::Outcome(TurnOutcome::Error { message }))
    }

    fn flush_text(
        &self,
        buffer: &mut String,
        usage: lace_protocol::TokenUsage,
        truncated: bool,
    ) -> Result<(), LoopError> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.store
            .append(
                &self.thread_id,
                EventData::AgentMessage {
                    text: buffer.clone(),
                    usage,
                    truncated,
                },
            )
            .context(loop_error::StoreSnafu)?;
        Ok(())
    }

    async fn run_tool_calls(
        &mut self,
        calls: Vec<ExecutorToolCall>,
    ) -> Result<ToolRunOutcome, LoopError> {
        for call in calls {
            let events_tx = self.events_tx.clone();
            let mut ctx = ToolContext::new(call.call_id.clone(), self.session_id.clone())
                .with_cancel_token(self.turn_token.child_token())
                .with_approval_notifier(Arc::new(move |request| {
                    if let Some(tx) = &events_tx {
                        let _ = tx.send(LoopEvent::ToolApprovalRequested { request });
                    }
                }));

            let outcome = match self.executor.execute(&call, &mut ctx).await {
                Ok(outcome) => outcome,
                Err(source) => return Err(source).context(loop_error::ToolSnafu),
            };

            if let Some(record) = &outcome.approval {
                self.store
                    .append(
                        &self.thread_id,
                        EventData::ToolApprovalRequest {
                            request: record.request.clone(),
                        },
                    )
                    .context(loop_error::StoreSnafu)?;
                self.store
                    .append(
                        &self.thread_id,
                        EventData::ToolApprovalResponse {
                            call_id: call.call_id.clone(),
                            decision: record.decision,
                        },
                    )
                    .context(loop_error::StoreSnafu)?;
                self.emit(LoopEvent::ToolApprovalResolved {
                    call_id: call.call_id.clone(),
                    decision: record.decision,
                });
            }

            let status = if outcome.output.is_error {
                ToolStatus::Failed
            } else {
                ToolStatus::Completed
            };

            self.store
                .append(
                    &self.thread_id,
                    EventData::ToolResult {
                        call_id: call.call_id.clone(),
                        status,
                        content: outcome.output.content.clone(),
                        is_error: outcome.output.is_error,
                    },
                )
                .context(loop_error::StoreSnafu)?;
            self.emit(LoopEvent::ToolResult {
                call_id: call.call_id.clone(),
                is_error: outcome.output.is_error,
            });

            if outcome.halt {
                return Ok(ToolRunOutcome::Halted);
            }
        }

        Ok(ToolRunOutcome::Continue)
    }

    async fn open_stream_with_retry(
        &mut self,
        messages: Vec<lace_provider::Message>,
        tools: Vec<lace_provider::ToolSpec>,
    ) -> Result<lace_provider::EventStream, LoopError> {
        let mut attempt = 0;
        loop {
            match self
                .provider
                .complete(messages.clone(), tools.clone(), CompleteOptions::default())
                .await
            {
                Ok(stream) => return Ok(stream),
                Err(source) if source.is_retryable() && attempt < self.retry.max_attempts => {
                    attempt += 1;
                    let delay_ms = self.retry.base_backoff_ms * 2u64.pow(attempt - 1);
                    self.emit(LoopEvent::Retry { attempt, delay_ms });
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
                Err(source) => return Err(source).context(loop_error::ProviderSnafu),
            }
        }
    }

}

/// Sum of the estimator's fallback count across every message, used to
/// gate a request against [`BudgetManager::can_request`] before a stream
/// opens and to backfill usage when a provider never reports any.
fn estimate_prompt_tokens(messages: &[lace_provider::Message]) -> u64 {
    messages.iter().map(|m| estimate_tokens(&m.content)).sum()
}

enum TurnStep {
    Continue,
    Outcome(TurnOutcome),
}

enum ToolRunOutcome {
    Continue,
    Halted,
}

fn state_name(state: AgentState) -> &'static str {
    match state {
        AgentState::Idle => "idle",
        AgentState::Thinking => "thinking",
        AgentState::Streaming => "streaming",
        AgentState::AwaitingTool => "awaiting_tool",
        AgentState::Stopping => "stopping",
        AgentState::Stopped => "stopped",
        AgentState::Error => "error",
    }
}

#[cfg(test)]
#[path = "agent.test.rs"]
mod tests;
