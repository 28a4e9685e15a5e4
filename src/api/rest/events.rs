//! Event endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bus_error_response;
use crate::bus::EventBus;
use crate::types::Event;

/// Request body for POST /events
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub payload: Option<Value>,
}

/// Response body for a successful publish
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub status: String,
    /// The event as stored, with its assigned id
    pub event: Event,
    /// Service ids the event reached, sorted
    pub delivered: Vec<String>,
    /// Service ids that went offline during this fan-out, sorted
    pub failed: Vec<String>,
}

/// POST /events - publish an event and fan it out
pub async fn publish_event(
    State(bus): State<Arc<EventBus>>,
    Json(body): Json<PublishRequest>,
) -> impl IntoResponse {
    let event_type = body.event_type.unwrap_or_default();
    let payload = body.payload.unwrap_or(Value::Null);

    match bus.publish(&event_type, payload).await {
        Ok(receipt) => {
            let response = PublishResponse {
                status: "event processed".to_string(),
                event: receipt.event,
                delivered: receipt.delivered,
                failed: receipt.failed,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => bus_error_response(&err),
    }
}

/// Response body for GET /events
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

/// GET /events - full event history in publication order
pub async fn list_events(State(bus): State<Arc<EventBus>>) -> Json<EventListResponse> {
    Json(EventListResponse {
        events: bus.events(),
    })
}
