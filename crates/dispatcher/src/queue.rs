//! PendingQueue - events held while the dispatcher is buffering

use std::collections::VecDeque;

use contracts::EventRecord;

/// FIFO of events submitted before activation.
///
/// Owned by the coordinator only. `drain` consumes the queue, so a queue can
/// be replayed at most once.
#[derive(Debug, Default)]
pub struct PendingQueue {
    events: VecDeque<EventRecord>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in arrival order, returns the new length
    pub fn push(&mut self, event: EventRecord) -> usize {
        self.events.push_back(event);
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the queue oldest first
    pub fn drain(self) -> impl Iterator<Item = EventRecord> {
        self.events.into_iter()
    }
}
