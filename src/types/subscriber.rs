//! Subscriber types
//!
//! A subscriber is a service that receives events over HTTP. The bus
//! tracks one record per service id: the webhook URL, the delivery
//! checkpoint (id of the last event the subscriber acknowledged) and
//! an online/offline reachability status.

use serde::{Deserialize, Serialize};

/// Checkpoint value for a subscriber that has acknowledged no events yet
pub const INITIAL_CHECKPOINT: i64 = -1;

/// Reachability status of a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    /// Receives live fan-out deliveries
    Online,
    /// Retries exhausted; skipped until re-registration
    Offline,
}

impl std::fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriberStatus::Online => write!(f, "online"),
            SubscriberStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Per-service delivery record kept by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Webhook endpoint events are POSTed to
    pub url: String,

    /// Highest event id successfully delivered; -1 before the first
    pub checkpoint: i64,

    /// Current reachability status
    pub status: SubscriberStatus,
}

impl Subscriber {
    /// Create a fresh record for a never-seen service
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            checkpoint: INITIAL_CHECKPOINT,
            status: SubscriberStatus::Online,
        }
    }

    /// Whether the subscriber takes part in live fan-out
    pub fn is_online(&self) -> bool {
        self.status == SubscriberStatus::Online
    }
}

/// Introspection view of one registry entry, with the service id inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberInfo {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    pub url: String,
    pub checkpoint: i64,
    pub status: SubscriberStatus,
}

impl SubscriberInfo {
    /// Flatten a registry entry into the list view
    pub fn from_entry(service_id: impl Into<String>, subscriber: &Subscriber) -> Self {
        Self {
            service_id: service_id.into(),
            url: subscriber.url.clone(),
            checkpoint: subscriber.checkpoint,
            status: subscriber.status,
        }
    }
}
