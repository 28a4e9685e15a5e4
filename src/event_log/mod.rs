//! Event log - append-only history of published events
//!
//! The log is the bus's source of truth. Ids are assigned from the
//! current length under the write lock, so they are dense (0, 1, 2, ..)
//! and every id pairs with exactly one immutable event. State lives in
//! memory only; a restart starts over from an empty log.

use parking_lot::RwLock;
use serde_json::Value;

use crate::types::Event;

/// Append-only in-memory event log
#[derive(Debug, Default)]
pub struct EventLog {
    events: RwLock<Vec<Event>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new event, assigning the next id
    ///
    /// Id assignment and insertion happen under one write lock, so
    /// concurrent publishers always observe dense, unique ids.
    pub fn append(&self, event_type: &str, payload: Value) -> Event {
        let mut events = self.events.write();
        let event = Event::new(events.len() as u64, event_type, payload);
        events.push(event.clone());
        event
    }

    /// All events with id strictly greater than `checkpoint`, in id order
    ///
    /// A checkpoint of -1 selects the whole log.
    pub fn since(&self, checkpoint: i64) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|e| e.id as i64 > checkpoint)
            .cloned()
            .collect()
    }

    /// Snapshot of the full log in publication order
    pub fn all(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Number of events published so far
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}
