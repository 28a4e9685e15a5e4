//! Debug sink - catch-all subscriber for eyeballing bus traffic
//!
//! Accepts any request, logs it and answers 200, so it can be pointed
//! at from the bus (or curl) while wiring services together. On
//! startup it registers itself with the bus; a bus that is not up yet
//! is logged and ignored.

use std::env;
use std::net::SocketAddr;

use anyhow::Result;
use axum::body::Bytes;
use axum::http::{Method, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(7000);
    let service_id = env::var("SERVICE_ID").unwrap_or_else(|_| "debug-sink".to_string());
    let bus_url = env::var("EVENT_BUS_URL").unwrap_or_else(|_| "http://localhost:4000".to_string());
    let sink_url = env::var("SINK_URL").unwrap_or_else(|_| format!("http://localhost:{port}/events"));

    let app = Router::new().fallback(log_request);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, service_id, "debug sink listening");

    // Register in the background so backlog replay finds us serving
    tokio::spawn(register_with_bus(bus_url, service_id, sink_url));

    axum::serve(listener, app).await?;
    Ok(())
}

/// Log whatever arrives and echo it back
async fn log_request(method: Method, uri: Uri, body: Bytes) -> Json<Value> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    info!(%method, path = %uri.path(), body = %body, "request received");

    Json(json!({
        "message": "request received",
        "received": {
            "method": method.as_str(),
            "path": uri.path(),
            "body": body,
        }
    }))
}

/// Announce this sink to the bus; failure is logged, not fatal
async fn register_with_bus(bus_url: String, service_id: String, sink_url: String) {
    let body = json!({ "serviceId": service_id, "url": sink_url });
    match reqwest::Client::new()
        .post(format!("{bus_url}/register"))
        .json(&body)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => {
            info!(bus_url, service_id, "registered with event bus");
        }
        Ok(response) => {
            warn!(bus_url, status = %response.status(), "event bus rejected registration");
        }
        Err(err) => {
            warn!(bus_url, error = %err, "could not reach event bus");
        }
    }
}
