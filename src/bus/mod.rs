//! Bus facade
//!
//! `EventBus` ties the log, the registry and the delivery engine into
//! the two write operations the service exposes: `register` (upsert +
//! backlog replay) and `publish` (append + fan-out). Input validation
//! happens here, before any state changes; delivery failures never
//! surface as errors, they are reported through receipts.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::BusConfig;
use crate::delivery::{DeliveryEngine, ReplayReport};
use crate::event_log::EventLog;
use crate::registry::SubscriberRegistry;
use crate::types::{Event, SubscriberInfo, SubscriberStatus};

/// Error type for bus operations
///
/// Only input validation and construction can fail; a subscriber's
/// unreachability is a receipt detail, not an error.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("serviceId is required")]
    MissingServiceId,

    #[error("url is required")]
    MissingUrl,

    #[error("type is required")]
    MissingEventType,

    #[error("payload is required")]
    MissingPayload,

    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Outcome of a register call: upsert result plus replay progress
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterReceipt {
    pub service_id: String,
    pub url: String,
    /// False when the service id was already known
    pub is_new: bool,
    /// Backlog events delivered during this call
    pub delivered: usize,
    /// Checkpoint after the replay
    pub checkpoint: i64,
    /// Online unless the replay aborted
    pub status: SubscriberStatus,
}

/// Outcome of a publish call: the stored event plus fan-out results
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    pub event: Event,
    /// Service ids the event reached, sorted
    pub delivered: Vec<String>,
    /// Service ids that went offline during this fan-out, sorted
    pub failed: Vec<String>,
}

/// The bus: one instance per process, shared behind `Arc`
pub struct EventBus {
    log: EventLog,
    registry: Arc<SubscriberRegistry>,
    delivery: DeliveryEngine,
}

impl EventBus {
    /// Build a bus from configuration
    ///
    /// Constructs the shared outbound HTTP client with the configured
    /// per-attempt timeout.
    pub fn new(config: BusConfig) -> BusResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let registry = Arc::new(SubscriberRegistry::new());
        let delivery = DeliveryEngine::new(registry.clone(), http, config.retry);
        Ok(Self {
            log: EventLog::new(),
            registry,
            delivery,
        })
    }

    /// Register a service and replay its backlog
    ///
    /// Re-registration is idempotent: it refreshes the URL and brings
    /// the subscriber back online, then replays only the events past
    /// its preserved checkpoint. A replay that aborts midway still
    /// produces a receipt; the final status tells the caller the
    /// subscriber went offline again.
    pub async fn register(&self, service_id: &str, url: &str) -> BusResult<RegisterReceipt> {
        if service_id.is_empty() {
            return Err(BusError::MissingServiceId);
        }
        if url.is_empty() {
            return Err(BusError::MissingUrl);
        }

        let previous_url = self.registry.get(service_id).map(|s| s.url);
        let (subscriber, is_new) = self.registry.upsert(service_id, url);
        if is_new {
            info!(service_id, url, "new service registered");
        } else if previous_url.as_deref() != Some(url) {
            info!(
                service_id,
                url,
                previous_url = previous_url.as_deref().unwrap_or_default(),
                "service re-registered with new url"
            );
        } else {
            info!(service_id, "service re-registered");
        }

        let backlog = self.log.since(subscriber.checkpoint);
        let report = if backlog.is_empty() {
            debug!(
                service_id,
                checkpoint = subscriber.checkpoint,
                "no backlog to replay"
            );
            ReplayReport {
                delivered: 0,
                aborted: false,
            }
        } else {
            info!(
                service_id,
                pending = backlog.len(),
                checkpoint = subscriber.checkpoint,
                "replaying backlog"
            );
            let report = self
                .delivery
                .replay_backlog(service_id, &subscriber.url, &backlog)
                .await;
            if report.aborted {
                warn!(
                    service_id,
                    delivered = report.delivered,
                    pending = backlog.len(),
                    "backlog replay aborted"
                );
            }
            report
        };

        // Replay moved checkpoint and status behind our snapshot
        let current = self.registry.get(service_id).unwrap_or(subscriber);
        Ok(RegisterReceipt {
            service_id: service_id.to_string(),
            url: current.url,
            is_new,
            delivered: report.delivered,
            checkpoint: current.checkpoint,
            status: current.status,
        })
    }

    /// Publish an event and fan it out to the online subscribers
    ///
    /// The event is appended before any delivery starts, so it is part
    /// of history (and of future replays) even if every subscriber is
    /// unreachable. The call returns once every subscriber that was
    /// online at append time has a delivered-or-gave-up outcome.
    pub async fn publish(&self, event_type: &str, payload: Value) -> BusResult<PublishReceipt> {
        if event_type.is_empty() {
            return Err(BusError::MissingEventType);
        }
        if payload.is_null() {
            return Err(BusError::MissingPayload);
        }

        let event = self.log.append(event_type, payload);
        info!(
            event_id = event.id,
            event_type = %event.event_type,
            "event published"
        );

        let targets = self.registry.online_subscribers();
        let report = self.delivery.fan_out(&targets, &event).await;
        if !report.failed.is_empty() {
            warn!(
                event_id = event.id,
                delivered = report.delivered.len(),
                failed = report.failed.len(),
                "fan-out took subscribers offline"
            );
        }

        Ok(PublishReceipt {
            event,
            delivered: report.delivered,
            failed: report.failed,
        })
    }

    /// Every known subscriber, sorted by service id
    pub fn subscribers(&self) -> Vec<SubscriberInfo> {
        self.registry.list()
    }

    /// Full event history in publication order
    pub fn events(&self) -> Vec<Event> {
        self.log.all()
    }
}
