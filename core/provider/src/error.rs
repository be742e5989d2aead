//! Errors a [`crate::Provider`] can raise before or during a stream.

use lace_error::ErrorExt;
use lace_error::Location;
use lace_error::StatusCode;
use snafu::Snafu;

/// Provider adapter errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ProviderError {
    /// Rate limited, connection reset, or another failure the agent loop
    /// should retry with backoff.
    #[snafu(display("transient provider error: {message}"))]
    Transient {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// Anything not worth retrying: bad request, auth failure, a response
    /// shape the adapter can't parse.
    #[snafu(display("provider error: {message}"))]
    Fatal {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProviderError::Transient { .. } => StatusCode::RateLimited,
            ProviderError::Fatal { .. } => StatusCode::ProviderError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
