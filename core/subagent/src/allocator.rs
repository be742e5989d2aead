//! Allocates child thread ids for delegated agents.

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use lace_protocol::ThreadId;

/// Hands out sequential `.N` child thread ids under a parent, so repeated
/// `delegate` calls from the same thread don't collide.
///
/// One allocator is shared across an entire session (every thread in the
/// tree), since a parent thread id is only ever extended by its own
/// children regardless of which agent instance is doing the allocating.
#[derive(Default)]
pub struct ChildThreadAllocator {
    counters: DashMap<ThreadId, AtomicU32>,
}

impl ChildThreadAllocator {
    /// Build an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next child id under `parent`, e.g. `lace_..._abc.1`,
    /// then `lace_..._abc.2`.
    pub fn allocate(&self, parent: &ThreadId) -> ThreadId {
        let counter = self
            .counters
            .entry(parent.clone())
            .or_insert_with(|| AtomicU32::new(0));
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        parent.child(n)
    }

    /// List the child ids already allocated under `parent`, in allocation
    /// order. Empty if `parent` has never delegated.
    pub fn children_of(&self, parent: &ThreadId) -> Vec<ThreadId> {
        let Some(counter) = self.counters.get(parent) else {
            return Vec::new();
        };
        let n = counter.load(Ordering::SeqCst);
        (1..=n).map(|i| parent.child(i)).collect()
    }
}

#[cfg(test)]
#[path = "allocator.test.rs"]
mod tests;
