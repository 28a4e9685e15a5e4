//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{events, register, subscribers};
use crate::bus::EventBus;

/// Create the Axum router with all endpoints
pub fn create_router(bus: Arc<EventBus>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Bus operations
        .route("/register", post(register::register_service))
        .route("/events", post(events::publish_event).get(events::list_events))
        // Introspection
        .route("/subscribers", get(subscribers::list_subscribers))
        .layer(cors)
        .with_state(bus)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
