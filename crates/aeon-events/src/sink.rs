use std::sync::RwLock;

use tracing::debug;

use crate::event::StorageEvent;

/// Destination for observable events.
///
/// Implementations must not fail: event recording is observational and a
/// sink that cannot keep up must drop or buffer on its own terms rather
/// than veto the mutation that produced the event.
pub trait EventSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: StorageEvent);
}

/// In-memory event log for tests, embedding, and local inspection.
///
/// Events are appended in commit order behind an `RwLock`. Since every
/// mutating operation on a store or registry instance runs to completion
/// before the next begins, the log order is the authority history.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<StorageEvent>>,
}

impl InMemoryEventLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events in commit order.
    pub fn events(&self) -> Vec<StorageEvent> {
        self.events.read().expect("lock poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.read().expect("lock poisoned").is_empty()
    }

    /// Discard all recorded events.
    pub fn clear(&self) {
        self.events.write().expect("lock poisoned").clear();
    }
}

impl EventSink for InMemoryEventLog {
    fn record(&self, event: StorageEvent) {
        debug!(event = %event, "recorded storage event");
        self.events.write().expect("lock poisoned").push(event);
    }
}

impl std::fmt::Debug for InMemoryEventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEventLog")
            .field("event_count", &self.len())
            .finish()
    }
}

/// Sink that discards every event, for callers with no observer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: StorageEvent) {}
}
