//! Reference [`ThreadStore`] implementation: everything lives in process
//! memory behind a [`DashMap`], one `RwLock<Vec<Event>>` per thread.

use std::sync::Mutex;
use std::sync::RwLock;

use dashmap::DashMap;
use lace_protocol::Event;
use lace_protocol::EventData;
use lace_protocol::ThreadId;

use crate::error::StoreError;
use crate::error::store_error::ConflictSnafu;
use crate::store::ThreadStore;

/// In-memory [`ThreadStore`]. Data does not survive process restart;
/// intended for tests and for embedding this crate where durability is
/// handled elsewhere.
#[derive(Debug, Default)]
pub struct InMemoryThreadStore {
    threads: DashMap<ThreadId, RwLock<Vec<Event>>>,
    latest: Mutex<Option<ThreadId>>,
}

impl InMemoryThreadStore {
    /// Build an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn touch_latest(&self, thread_id: &ThreadId) {
        #[allow(clippy::unwrap_used)]
        {
            *self.latest.lock().unwrap() = Some(thread_id.clone());
        }
    }
}

impl ThreadStore for InMemoryThreadStore {
    fn append(&self, thread_id: &ThreadId, data: EventData) -> Result<Event, StoreError> {
        let entry = self
            .threads
            .entry(thread_id.clone())
            .or_insert_with(|| RwLock::new(Vec::new()));
        #[allow(clippy::unwrap_used)]
        let mut events = entry.write().unwrap();
        let seq = events.len() as u64;
        let event = Event::new(thread_id.clone(), seq, data);
        events.push(event.clone());
        drop(events);
        self.touch_latest(thread_id);
        Ok(event)
    }

    fn events(&self, thread_id: &ThreadId) -> Result<Vec<Event>, StoreError> {
        match self.threads.get(thread_id) {
            #[allow(clippy::unwrap_used)]
            Some(entry) => Ok(entry.read().unwrap().clone()),
            None => Ok(Vec::new()),
        }
    }

    fn latest_thread_id(&self) -> Option<ThreadId> {
        #[allow(clippy::unwrap_used)]
        self.latest.lock().unwrap().clone()
    }

    fn compact(
        &self,
        thread_id: &ThreadId,
        strategy_id: &str,
        last_idx: usize,
        replacement: Vec<EventData>,
    ) -> Result<Event, StoreError> {
        let entry = self
            .threads
            .entry(thread_id.clone())
            .or_insert_with(|| RwLock::new(Vec::new()));
        #[allow(clippy::unwrap_used)]
        let mut events = entry.write().unwrap();

        if last_idx >= events.len() {
            return ConflictSnafu {
                thread_id: thread_id.clone(),
                message: format!(
                    "compact targeted index {last_idx} but thread has only {} events",
                    events.len()
                ),
            }
            .fail();
        }

        let original_event_count = (last_idx + 1) as u64;
        let tail = events.split_off(last_idx + 1);

        let compaction = EventData::Compaction {
            strategy_id: strategy_id.to_string(),
            original_event_count,
            replacement,
        };
        let compaction_event = Event::new(thread_id.clone(), 0, compaction);

        events.clear();
        events.push(compaction_event);
        events.extend(tail);
        // Renumber seq so the post-compaction sequence is dense from 0,
        // with the compaction event itself occupying slot 0.
        for (idx, event) in events.iter_mut().enumerate() {
            event.seq = idx as u64;
        }
        let result = events[0].clone();
        drop(events);
        self.touch_latest(thread_id);
        Ok(result)
    }
}

#[cfg(test)]
#[path = "in_memory.test.rs"]
mod tests;
