//! Errors a [`crate::ToolExecutor`] can raise. Everything a model should
//! see (validation failures, denials, execution failures) is converted to
//! a failed [`lace_protocol::ToolOutput`] instead; only a `stop` decision
//! and cancellation propagate as an error, since both must interrupt the
//! whole agent loop rather than just the one call.

use lace_error::ErrorExt;
use lace_error::Location;
use lace_error::StatusCode;
use snafu::Snafu;

/// Errors a tool body or the executor can raise.
///
/// [`ToolError::UserStopped`] and [`ToolError::Cancelled`] propagate out
/// of [`crate::ToolExecutor::execute`] to halt the agent loop; every other
/// variant is caught by the executor and converted into a failed
/// [`lace_protocol::ToolOutput`] so the model can see and react to it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ToolError {
    /// The approval callback returned [`lace_protocol::ApprovalDecision::Stop`].
    /// The caller must halt the agent loop, not just fail this one call.
    #[snafu(display("user stopped the loop at {tool_name} ({call_id})"))]
    UserStopped {
        call_id: String,
        tool_name: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// The session's cancellation token fired mid-execution.
    #[snafu(display("cancelled"))]
    Cancelled {
        #[snafu(implicit)]
        location: Location,
    },

    /// The tool body failed to do its work.
    #[snafu(display("execution failed: {message}"))]
    ExecutionFailed {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// An I/O failure within a tool body.
    #[snafu(display("io error: {message}"))]
    Io {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ToolError {
    /// Whether this is a cancellation rather than a user stop.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ToolError::Cancelled { .. })
    }

    /// Whether this must propagate out of the executor rather than be
    /// converted into call output.
    pub fn halts_loop(&self) -> bool {
        matches!(self, ToolError::UserStopped { .. } | ToolError::Cancelled { .. })
    }
}

impl ErrorExt for ToolError {
    fn status_code(&self) -> StatusCode {
        match self {
            ToolError::UserStopped { .. } => StatusCode::Cancelled,
            ToolError::Cancelled { .. } => StatusCode::Cancelled,
            ToolError::ExecutionFailed { .. } => StatusCode::External,
            ToolError::Io { .. } => StatusCode::IoError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        tool_error::IoSnafu {
            message: err.to_string(),
        }
        .build()
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
