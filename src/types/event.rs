//! Event types for the bus log
//!
//! An event is an immutable record published on the bus. Events are
//! identified by a monotonically increasing id and never change after
//! publication; delivery state lives on the subscriber side.

use serde::{Deserialize, Serialize};

/// An immutable event in the bus log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique, auto-incrementing event ID (0-based)
    pub id: u64,

    /// Application-defined event type, e.g. "user.created"
    #[serde(rename = "type")]
    pub event_type: String,

    /// Opaque publisher-supplied payload
    pub payload: serde_json::Value,
}

impl Event {
    /// Create an event with an already-assigned id
    pub fn new(id: u64, event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id,
            event_type: event_type.into(),
            payload,
        }
    }
}
