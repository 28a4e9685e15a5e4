//! Webhook delivery
//!
//! All outbound traffic goes through the DeliveryEngine: it POSTs
//! events to subscriber URLs, retries on failure with a fixed delay,
//! advances checkpoints on success and flips subscribers offline when
//! a retry cycle is exhausted. Backlog replay and live fan-out are
//! both built on the same per-event cycle, so the bookkeeping rules
//! hold everywhere.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::registry::SubscriberRegistry;
use crate::types::{Event, Subscriber};

/// Error type for a single delivery attempt
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("subscriber answered HTTP {0}")]
    Status(StatusCode),
}

/// How many times to POST an event and how long to pause in between
///
/// The delay is fixed; there is no backoff growth between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per event before giving up (min 1)
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
        }
    }
}

/// Result of one delivery cycle for one (subscriber, event) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// A 2xx came back within the attempt budget
    Delivered { attempts: u32 },
    /// Every attempt failed; the subscriber is now offline
    Failed { attempts: u32 },
}

impl DeliveryOutcome {
    /// Whether the event reached the subscriber
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Result of replaying a backlog to one subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    /// Events delivered before the replay stopped
    pub delivered: usize,
    /// True when a delivery cycle failed and the rest was skipped
    pub aborted: bool,
}

/// Result of fanning one event out to the online subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    /// Service ids the event reached, sorted
    pub delivered: Vec<String>,
    /// Service ids that exhausted their retries, sorted
    pub failed: Vec<String>,
}

/// POSTs events to subscribers and keeps the registry honest about it
pub struct DeliveryEngine {
    registry: Arc<SubscriberRegistry>,
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl DeliveryEngine {
    /// Create an engine over a shared registry
    pub fn new(registry: Arc<SubscriberRegistry>, http: reqwest::Client, policy: RetryPolicy) -> Self {
        Self {
            registry,
            http,
            policy,
        }
    }

    /// Run one full delivery cycle for one event
    ///
    /// On the first 2xx the subscriber's checkpoint advances right away
    /// and the cycle ends. When the attempt budget runs out the
    /// subscriber goes offline and keeps its checkpoint, so a later
    /// re-registration resumes from the exact failure point.
    pub async fn deliver(&self, service_id: &str, url: &str, event: &Event) -> DeliveryOutcome {
        for attempt in 1..=self.policy.max_attempts {
            match self.attempt(url, event).await {
                Ok(()) => {
                    self.registry.mark_delivered(service_id, event.id);
                    debug!(service_id, event_id = event.id, attempt, "event delivered");
                    return DeliveryOutcome::Delivered { attempts: attempt };
                }
                Err(err) => {
                    warn!(
                        service_id,
                        event_id = event.id,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %err,
                        "delivery attempt failed"
                    );
                    if attempt < self.policy.max_attempts {
                        sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        self.registry.mark_offline(service_id);
        warn!(
            service_id,
            event_id = event.id,
            "retries exhausted, subscriber marked offline"
        );
        DeliveryOutcome::Failed {
            attempts: self.policy.max_attempts,
        }
    }

    /// Replay a backlog to one subscriber, oldest first
    ///
    /// Stops at the first event whose cycle fails: delivering event
    /// n+1 before event n would break per-subscriber ordering, and the
    /// failed cycle has already taken the subscriber offline.
    pub async fn replay_backlog(
        &self,
        service_id: &str,
        url: &str,
        backlog: &[Event],
    ) -> ReplayReport {
        let mut delivered = 0;
        for event in backlog {
            if !self.deliver(service_id, url, event).await.is_delivered() {
                return ReplayReport {
                    delivered,
                    aborted: true,
                };
            }
            delivered += 1;
        }
        ReplayReport {
            delivered,
            aborted: false,
        }
    }

    /// Fan one event out to a snapshot of online subscribers
    ///
    /// Cycles run concurrently and the call resolves once every one of
    /// them has a final outcome. One subscriber's failure never stops
    /// the others.
    pub async fn fan_out(&self, targets: &[(String, Subscriber)], event: &Event) -> FanOutReport {
        let outcomes = join_all(targets.iter().map(|(service_id, subscriber)| async move {
            let outcome = self.deliver(service_id, &subscriber.url, event).await;
            (service_id.clone(), outcome)
        }))
        .await;

        let mut report = FanOutReport {
            delivered: Vec::new(),
            failed: Vec::new(),
        };
        for (service_id, outcome) in outcomes {
            if outcome.is_delivered() {
                report.delivered.push(service_id);
            } else {
                report.failed.push(service_id);
            }
        }
        report.delivered.sort();
        report.failed.sort();
        report
    }

    /// POST the event once and interpret the response
    async fn attempt(&self, url: &str, event: &Event) -> Result<(), DeliveryError> {
        let response = self.http.post(url).json(event).send().await?;
        if !response.status().is_success() {
            return Err(DeliveryError::Status(response.status()));
        }
        Ok(())
    }
}
