//! Data types for the Event Bus service
//!
//! This module contains the core data structures shared by the log,
//! the registry and the HTTP API.

mod event;
mod subscriber;

pub use event::Event;
pub use subscriber::{Subscriber, SubscriberInfo, SubscriberStatus, INITIAL_CHECKPOINT};
