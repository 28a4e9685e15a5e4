//! Shared helpers for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;

use event_bus::{BusConfig, Event, RetryPolicy};

/// Bus configuration with short retries so failure tests stay fast
pub fn test_config(max_attempts: u32) -> BusConfig {
    BusConfig {
        retry: RetryPolicy {
            max_attempts,
            retry_delay: Duration::from_millis(5),
        },
        ..BusConfig::default()
    }
}

/// Subscriber sink that answers scripted statuses, then a fallback status
pub struct StubSink {
    pub url: String,
    state: Arc<SinkState>,
}

struct SinkState {
    /// Statuses served first, one per request
    script: Mutex<VecDeque<StatusCode>>,
    /// Status served once the script is used up
    fallback: StatusCode,
    /// Pause before answering each request
    delay: Duration,
    /// Bodies of accepted (2xx) requests
    received: Mutex<Vec<Event>>,
    /// Total requests seen, accepted or not
    hits: Mutex<u32>,
}

async fn sink_handler(State(state): State<Arc<SinkState>>, Json(event): Json<Event>) -> StatusCode {
    *state.hits.lock() += 1;
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let status = state.script.lock().pop_front().unwrap_or(state.fallback);
    if status.is_success() {
        state.received.lock().push(event);
    }
    status
}

impl StubSink {
    /// Start a sink on an ephemeral port
    pub async fn start(fallback: StatusCode) -> Self {
        Self::start_with_delay(fallback, Duration::ZERO).await
    }

    /// Start a sink that waits before answering each request
    pub async fn start_with_delay(fallback: StatusCode, delay: Duration) -> Self {
        let state = Arc::new(SinkState {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay,
            received: Mutex::new(Vec::new()),
            hits: Mutex::new(0),
        });
        let app = Router::new()
            .route("/events", post(sink_handler))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/events", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { url, state }
    }

    /// Queue statuses to serve before falling back again
    pub fn script(&self, statuses: &[StatusCode]) {
        self.state.script.lock().extend(statuses.iter().copied());
    }

    /// Events accepted so far, in arrival order
    pub fn received(&self) -> Vec<Event> {
        self.state.received.lock().clone()
    }

    /// Ids of the accepted events, in arrival order
    pub fn received_ids(&self) -> Vec<u64> {
        self.received().iter().map(|e| e.id).collect()
    }

    /// Requests seen, accepted or not
    pub fn hits(&self) -> u32 {
        *self.state.hits.lock()
    }
}

/// URL that refuses connections (bound, then immediately dropped)
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/events", listener.local_addr().unwrap());
    drop(listener);
    url
}
