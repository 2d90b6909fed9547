//! Execution context for one state transition

use crate::cache::CacheStore;
use crate::event::{Event, EventManager};
use crate::kv::KvStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Header of the block being executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: i64,
    pub time: DateTime<Utc>,
}

impl BlockHeader {
    pub fn new(height: i64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }
}

/// Store, block header and event sink handed to every operation
///
/// `branch` gives per-message atomicity: the closure runs against a
/// [`CacheStore`] and only a successful result is written back, together with
/// the events it emitted.
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    header: BlockHeader,
    events: EventManager,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore, header: BlockHeader) -> Self {
        Self {
            store,
            header,
            events: EventManager::new(),
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.header.time
    }

    pub fn block_height(&self) -> i64 {
        self.header.height
    }

    pub fn set_block_time(&mut self, time: DateTime<Utc>) {
        self.header.time = time;
    }

    /// Move to the next block, `elapsed` later
    pub fn next_block(&mut self, elapsed: Duration) {
        self.header.height += 1;
        self.header.time += elapsed;
    }

    pub fn store(&self) -> &(dyn KvStore + 'a) {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut (dyn KvStore + 'a) {
        &mut *self.store
    }

    pub fn emit(&mut self, event: Event) {
        self.events.emit(event);
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    /// Run `f` in a cached branch of this context
    ///
    /// On `Ok` the branch's writes and events are applied to `self`; on `Err`
    /// both are discarded and `self` is left untouched.
    pub fn branch<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Context<'_>) -> Result<T, E>,
    {
        let header = self.header.clone();
        let mut cache = CacheStore::new(&mut *self.store);
        let (result, events) = {
            let mut child = Context::new(&mut cache, header);
            let result = f(&mut child);
            (result, child.take_events())
        };

        if result.is_ok() {
            cache.write();
            self.events.extend(events);
        } else {
            tracing::trace!(discarded = cache.pending(), "Discarding failed branch");
        }
        result
    }
}
