//! The provider capability boundary: turn a prompt into a stream of
//! [`ProviderEvent`]s. No concrete wire adapter lives in this workspace;
//! implementing one for a specific vendor API is out of scope here.

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::error::ProviderError;
use crate::message::Message;
use crate::message::ToolSpec;

/// Options that shape a single completion request.
#[derive(Debug, Clone, Default)]
pub struct CompleteOptions {
    /// Maximum output tokens the provider should produce.
    pub max_tokens: Option<u64>,
    /// Sampling temperature, where the provider supports one.
    pub temperature: Option<f64>,
}

/// A stream of [`ProviderEvent`]s for one turn.
pub type EventStream = Pin<Box<dyn Stream<Item = crate::event::ProviderEvent> + Send>>;

/// The capability every agent turn is built on: take a flattened prompt
/// and a tool inventory, return a stream of events.
///
/// Single producer per call; the stream is finite and always ends with
/// exactly one [`crate::event::ProviderEvent::Finish`]. Dropping the
/// stream before it finishes (cancellation) must not panic the producer.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Begin a completion. Returns an error only for failures that occur
    /// before the stream itself can be constructed (auth, connection
    /// setup); failures during streaming are reported as
    /// `Finish(FinishReason::Error)` so the agent loop's retry logic sees
    /// them uniformly.
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolSpec>,
        options: CompleteOptions,
    ) -> Result<EventStream, ProviderError>;
}

#[cfg(test)]
#[path = "provider.test.rs"]
mod tests;
