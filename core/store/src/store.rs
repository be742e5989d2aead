//! The thread store contract: an append-only, replayable event log keyed
//! by [`ThreadId`].

use lace_protocol::Event;
use lace_protocol::EventData;
use lace_protocol::ThreadId;

use crate::error::StoreError;

/// Append-only storage for thread event logs.
///
/// Implementations must guarantee: events within a thread are returned in
/// strictly increasing `seq` order; a reader that starts after an `append`
/// observes it; a `compact` is observed as a single atomic swap, never a
/// partial prefix.
pub trait ThreadStore: Send + Sync {
    /// Append one event to `thread_id`, assigning it the next `seq`.
    fn append(&self, thread_id: &ThreadId, data: EventData) -> Result<Event, StoreError>;

    /// Read the full event sequence for a thread, including any prior
    /// `COMPACTION` replacement events as if they were original.
    ///
    /// Returns an empty vector for a thread that has never been appended
    /// to, rather than an error.
    fn events(&self, thread_id: &ThreadId) -> Result<Vec<Event>, StoreError>;

    /// The most recently touched thread, if any. Used for CLI-style
    /// resume of the last active session.
    fn latest_thread_id(&self) -> Option<ThreadId>;

    /// Atomically replace the current contiguous prefix `[0..=last_idx]`
    /// with a single `COMPACTION` event carrying `replacement` as its
    /// payload.
    ///
    /// `last_idx` is the index (not `seq`) of the last event to fold into
    /// the compaction; callers computing it from a `seq` they observed
    /// earlier may race with a concurrent append, in which case this
    /// returns [`StoreError::Conflict`] and the caller should re-read and
    /// retry.
    fn compact(
        &self,
        thread_id: &ThreadId,
        strategy_id: &str,
        last_idx: usize,
        replacement: Vec<EventData>,
    ) -> Result<Event, StoreError>;
}
