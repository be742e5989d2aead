//! Errors a [`crate::session::Session`] can raise.

use lace_error::ErrorExt;
use lace_error::Location;
use lace_error::StatusCode;
use lace_loop::LoopError;
use snafu::Snafu;

/// Errors raised by session-level operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum SessionError {
    /// The root agent's turn loop failed; see `source` for the cause.
    #[snafu(display("session turn failed: {source}"))]
    Turn {
        source: LoopError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::Turn { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
