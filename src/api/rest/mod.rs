//! REST API module for HTTP endpoints
//!
//! One module per resource:
//! - `POST /register` - register a subscriber, replay its backlog
//! - `POST /events` - publish an event, fan it out
//! - `GET /events` - full event history
//! - `GET /subscribers` - registry state

pub mod events;
pub mod register;
pub mod subscribers;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::bus::BusError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

/// Map a bus error onto the HTTP error body
pub fn bus_error_response(err: &BusError) -> Response {
    let (status, body) = match err {
        BusError::Client(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::internal(err.to_string()),
        ),
        _ => (StatusCode::BAD_REQUEST, ApiError::bad_request(err.to_string())),
    };
    (status, Json(body)).into_response()
}
