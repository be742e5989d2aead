//! [`ErrorExt`]: the trait every crate-local error enum implements so a
//! caller above several crates can classify failures generically.

use std::any::Any;
use std::fmt;

use crate::status_code::StatusCode;

/// Extension behavior every lace error type provides on top of
/// [`std::error::Error`].
///
/// Crate-local error enums (`ToolError`, `LoopError`, `StoreError`, ...)
/// implement this directly. It lets code above the crate boundary decide
/// whether to retry or log without matching on the concrete enum.
pub trait ErrorExt: std::error::Error {
    /// Classify this error into the shared [`StatusCode`] taxonomy.
    fn status_code(&self) -> StatusCode;

    /// Whether the caller may retry the operation that produced this error.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Whether this error is worth logging at `error` level.
    fn should_log(&self) -> bool {
        self.status_code().should_log_error()
    }

    /// A message safe to show outside the process.
    ///
    /// Errors whose status code is flagged `log_error` (internal bugs,
    /// unexpected external failures) get a generic `"<Name> error: <code>"`
    /// message instead of their `Display` text, so stack traces or raw
    /// upstream error bodies never leak to a user-facing surface.
    fn output_msg(&self) -> String {
        let code = self.status_code();
        if code.should_log_error() {
            format!("{} error: {}", code.name(), code as i32)
        } else {
            self.to_string()
        }
    }

    /// Narrow back to a concrete type, for callers that need to match on
    /// the original error after it has been passed around as `&dyn ErrorExt`.
    fn as_any(&self) -> &dyn Any;
}

/// A minimal [`ErrorExt`] implementation for call sites that don't warrant
/// a dedicated `snafu` enum — one message, one status code.
#[derive(Debug, Clone)]
pub struct PlainError {
    message: String,
    code: StatusCode,
}

impl PlainError {
    /// Create a plain error with the given message and classification.
    pub fn new(message: impl Into<String>, code: StatusCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PlainError {}

impl ErrorExt for PlainError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An arbitrary external error, wrapped with a [`StatusCode`] so it can
/// cross into lace's error taxonomy. `.source()` reaches the original error.
#[derive(Debug)]
pub struct BoxedError {
    inner: Box<dyn std::error::Error + Send + Sync>,
    code: StatusCode,
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for BoxedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl ErrorExt for BoxedError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wrap an arbitrary error under a [`StatusCode`], preserving it as `.source()`.
pub fn boxed(err: impl std::error::Error + Send + Sync + 'static, code: StatusCode) -> BoxedError {
    BoxedError {
        inner: Box::new(err),
        code,
    }
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
