//! Errors the agent turn loop can raise.

use lace_error::ErrorExt;
use lace_error::Location;
use lace_error::StatusCode;
use lace_provider::ProviderError;
use lace_store::StoreError;
use lace_tools::ToolError;
use snafu::Snafu;

/// Errors raised by [`crate::agent::Agent::send_message`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum LoopError {
    /// `send_message` was called while the agent was already processing a
    /// turn.
    #[snafu(display("agent is busy (state: {state})"))]
    Busy {
        state: &'static str,
        #[snafu(implicit)]
        location: Location,
    },

    /// The provider stream failed and retries were exhausted or the
    /// failure wasn't retryable.
    #[snafu(display("provider error: {source}"))]
    Provider {
        source: ProviderError,
        #[snafu(implicit)]
        location: Location,
    },

    /// The thread store failed.
    #[snafu(display("store error: {source}"))]
    Store {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    /// A tool call propagated rather than converting to a failed result
    /// ([`ToolError::Cancelled`], the only case left here once the
    /// executor's own `UserStopped`-halts-the-loop path is folded into
    /// normal turn control flow via a `stop` approval decision).
    #[snafu(display("tool execution error: {source}"))]
    Tool {
        source: ToolError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for LoopError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoopError::Busy { .. } => StatusCode::InvalidRequest,
            LoopError::Provider { source, .. } => source.status_code(),
            LoopError::Store { source, .. } => source.status_code(),
            LoopError::Tool { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
