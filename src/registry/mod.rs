//! Subscriber registry
//!
//! One record per service id, keyed by the id the service registers
//! under. Registration is an idempotent upsert: repeating it refreshes
//! the URL and forces the subscriber online but never touches its
//! delivery checkpoint, so an outage never causes replayed history to
//! be double-counted.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::{Subscriber, SubscriberInfo, SubscriberStatus};

/// In-memory registry of known subscribers
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<String, Subscriber>>,
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or refresh a subscriber
    ///
    /// Unknown ids get a fresh record (checkpoint -1, online). Known
    /// ids keep their checkpoint, take the new URL and come back
    /// online. Returns the record as stored plus whether it was new.
    pub fn upsert(&self, service_id: &str, url: &str) -> (Subscriber, bool) {
        let mut subscribers = self.subscribers.write();
        match subscribers.get_mut(service_id) {
            Some(existing) => {
                existing.url = url.to_string();
                existing.status = SubscriberStatus::Online;
                (existing.clone(), false)
            }
            None => {
                let subscriber = Subscriber::new(url);
                subscribers.insert(service_id.to_string(), subscriber.clone());
                (subscriber, true)
            }
        }
    }

    /// Advance a subscriber's checkpoint after a confirmed delivery
    ///
    /// Checkpoints only move forward: a late acknowledgement for an
    /// older event never rewinds progress.
    pub fn mark_delivered(&self, service_id: &str, event_id: u64) {
        if let Some(subscriber) = self.subscribers.write().get_mut(service_id) {
            subscriber.checkpoint = subscriber.checkpoint.max(event_id as i64);
        }
    }

    /// Take a subscriber out of live fan-out after exhausted retries
    pub fn mark_offline(&self, service_id: &str) {
        if let Some(subscriber) = self.subscribers.write().get_mut(service_id) {
            subscriber.status = SubscriberStatus::Offline;
        }
    }

    /// Snapshot of the subscribers currently eligible for fan-out
    pub fn online_subscribers(&self) -> Vec<(String, Subscriber)> {
        self.subscribers
            .read()
            .iter()
            .filter(|(_, s)| s.is_online())
            .map(|(id, s)| (id.clone(), s.clone()))
            .collect()
    }

    /// Introspection list of every known subscriber, sorted by service id
    pub fn list(&self) -> Vec<SubscriberInfo> {
        let mut infos: Vec<SubscriberInfo> = self
            .subscribers
            .read()
            .iter()
            .map(|(id, s)| SubscriberInfo::from_entry(id, s))
            .collect();
        infos.sort_by(|a, b| a.service_id.cmp(&b.service_id));
        infos
    }

    /// Current record for one service id
    pub fn get(&self, service_id: &str) -> Option<Subscriber> {
        self.subscribers.read().get(service_id).cloned()
    }

    /// Number of registered subscribers (any status)
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Whether no service has ever registered
    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }
}
