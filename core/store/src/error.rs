//! Errors raised by a [`crate::ThreadStore`].

use lace_error::ErrorExt;
use lace_error::Location;
use lace_error::StatusCode;
use lace_protocol::ThreadId;
use snafu::Snafu;

/// Thread store errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum StoreError {
    /// `compact` targeted an index range that no longer matches the
    /// thread's current length, because another writer appended or
    /// compacted concurrently.
    #[snafu(display("conflicting write on thread {thread_id}: {message}"))]
    Conflict {
        thread_id: ThreadId,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// The backing storage failed (disk, network, ...). The in-memory
    /// reference implementation never raises this; it exists for future
    /// durable backends.
    #[snafu(display("storage error on thread {thread_id}: {message}"))]
    Storage {
        thread_id: ThreadId,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// A thread's event sequence violates an invariant on replay (gap in
    /// `seq`, an `EventData` tag rejected by the schema, ...). The thread
    /// is surfaced as read-only rather than silently repaired.
    #[snafu(display("thread {thread_id} is corrupt: {message}"))]
    ThreadCorrupt {
        thread_id: ThreadId,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Conflict { .. } => StatusCode::Internal,
            StoreError::Storage { .. } => StatusCode::IoError,
            StoreError::ThreadCorrupt { .. } => StatusCode::Internal,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
