//! A scriptable [`Provider`] double that replays a pre-recorded sequence
//! of events, used by every test in this workspace that needs to drive
//! an agent turn without a real vendor API.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::event::ProviderEvent;
use crate::message::Message;
use crate::message::ToolSpec;
use crate::provider::CompleteOptions;
use crate::provider::EventStream;
use crate::provider::Provider;

/// One scripted turn: a fixed sequence of events to emit, in order, the
/// next time `complete` is called.
pub type ScriptedTurn = Vec<ProviderEvent>;

/// Replays scripted turns in call order; each call to
/// [`Provider::complete`] consumes the next turn in the script.
///
/// Also records every prompt it was called with, so tests can assert on
/// what the agent loop actually sent (e.g. that tool results from a
/// previous turn were included in the replay).
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    turns: Mutex<VecDeque<ScriptedTurn>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    /// Build a provider that emits `turns` in order, one per call.
    pub fn new(turns: Vec<ScriptedTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The prompts passed to every `complete` call so far, in order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        #[allow(clippy::unwrap_used)]
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _tools: Vec<ToolSpec>,
        _options: CompleteOptions,
    ) -> Result<EventStream, ProviderError> {
        #[allow(clippy::unwrap_used)]
        {
            self.calls.lock().unwrap().push(messages);
        }
        #[allow(clippy::unwrap_used)]
        let turn = self.turns.lock().unwrap().pop_front();
        let events = turn.ok_or_else(|| {
            crate::error::provider_error::FatalSnafu {
                message: "ScriptedProvider has no more turns queued".to_string(),
            }
            .build()
        })?;
        Ok(Box::pin(tokio_stream::iter(events)))
    }
}

#[cfg(test)]
#[path = "scripted.test.rs"]
mod tests;
