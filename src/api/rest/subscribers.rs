//! Subscriber introspection endpoint

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::bus::EventBus;
use crate::types::SubscriberInfo;

/// GET /subscribers - every known subscriber, sorted by service id
///
/// Returns a bare array; offline subscribers are included so operators
/// can see who needs to re-register.
pub async fn list_subscribers(State(bus): State<Arc<EventBus>>) -> Json<Vec<SubscriberInfo>> {
    Json(bus.subscribers())
}
