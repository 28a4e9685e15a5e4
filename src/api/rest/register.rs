//! Registration endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::bus_error_response;
use crate::bus::EventBus;
use crate::types::{SubscriberInfo, SubscriberStatus};

/// Request body for POST /register
///
/// Fields are optional so that a missing key produces the bus's own
/// 400 response instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    pub url: Option<String>,
}

/// Response body for a successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: String,
    /// Backlog events delivered during this call
    pub delivered: usize,
    /// Registry state after the replay
    pub subscriber: SubscriberInfo,
}

/// POST /register - register a service and replay its backlog
pub async fn register_service(
    State(bus): State<Arc<EventBus>>,
    Json(body): Json<RegisterRequest>,
) -> impl IntoResponse {
    let service_id = body.service_id.unwrap_or_default();
    let url = body.url.unwrap_or_default();

    match bus.register(&service_id, &url).await {
        Ok(receipt) => {
            let status = match receipt.status {
                SubscriberStatus::Online if receipt.delivered > 0 => {
                    format!("registered, {} backlog events delivered", receipt.delivered)
                }
                SubscriberStatus::Online => "registered".to_string(),
                SubscriberStatus::Offline => format!(
                    "registered, backlog replay incomplete after {} deliveries",
                    receipt.delivered
                ),
            };
            let response = RegisterResponse {
                status,
                delivered: receipt.delivered,
                subscriber: SubscriberInfo {
                    service_id: receipt.service_id,
                    url: receipt.url,
                    checkpoint: receipt.checkpoint,
                    status: receipt.status,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => bus_error_response(&err),
    }
}
