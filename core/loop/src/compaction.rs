//! Pluggable compaction strategies: given a thread's events, produce a
//! replacement sequence that summarizes them.

use async_trait::async_trait;
use lace_message::AssembleOptions;
use lace_message::assemble_prompt;
use lace_protocol::Event;
use lace_protocol::EventData;
use lace_protocol::TokenUsage;
use lace_provider::CompleteOptions;
use lace_provider::Message;
use lace_provider::Provider;
use lace_provider::ProviderEvent;
use snafu::ResultExt as _;
use tokio_stream::StreamExt;

use crate::error::LoopError;
use crate::error::loop_error::ProviderSnafu;

/// Produces a replacement event sequence for a contiguous prefix of a
/// thread, standing in for what it summarizes.
///
/// The replacement must attach token usage to its summary messages so
/// [`lace_context::BudgetManager::handle_compaction`]'s reset math holds.
#[async_trait]
pub trait CompactionStrategy: Send + Sync {
    /// Identifier recorded on the resulting `COMPACTION` event, for audit.
    fn strategy_id(&self) -> &str;

    /// Summarize `events` into a short replacement sequence.
    async fn compact(&self, events: &[Event]) -> Result<Vec<EventData>, LoopError>;
}

/// Default strategy: ask the provider to summarize the transcript so far
/// into a single `AGENT_MESSAGE`.
pub struct SummarizeWithModel {
    provider: std::sync::Arc<dyn Provider>,
}

impl SummarizeWithModel {
    /// Build a strategy that summarizes through `provider`.
    pub fn new(provider: std::sync::Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

const SUMMARY_INSTRUCTIONS: &str = "Summarize the conversation so far concisely, preserving key facts, decisions, and any open tasks. Write only the summary.";

#[async_trait]
impl CompactionStrategy for SummarizeWithModel {
    fn strategy_id(&self) -> &str {
        "summarize-with-model"
    }

    async fn compact(&self, events: &[Event]) -> Result<Vec<EventData>, LoopError> {
        let transcript = assemble_prompt(events, &AssembleOptions::default());
        let joined = transcript
            .iter()
            .map(|m| format!("{:?}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = vec![Message::user(format!(
            "{SUMMARY_INSTRUCTIONS}\n\n{joined}"
        ))];

        let mut stream = self
            .provider
            .complete(prompt, Vec::new(), CompleteOptions::default())
            .await
            .context(ProviderSnafu)?;

        let mut summary = String::new();
        let mut usage = TokenUsage::default();
        while let Some(event) = stream.next().await {
            match event {
                ProviderEvent::TextDelta(delta) => summary.push_str(&delta),
                ProviderEvent::Usage(u) => usage = usage.add(u),
                ProviderEvent::Finish(_) => break,
                _ => {}
            }
        }

        Ok(vec![EventData::AgentMessage {
            text: summary,
            usage,
            truncated: false,
        }])
    }
}

#[cfg(test)]
#[path = "compaction.test.rs"]
mod tests;
