//! HTTP API integration tests
//!
//! Drives the router directly with tower's `oneshot` and asserts on
//! status codes and response bodies.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use common::{test_config, StubSink};
use event_bus::api::http::create_router;
use event_bus::EventBus;

fn test_app(max_attempts: u32) -> Router {
    let bus = Arc::new(EventBus::new(test_config(max_attempts)).unwrap());
    create_router(bus)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_register_requires_service_id() {
    let app = test_app(2);

    let (status, body) = post_json(
        app,
        "/register",
        json!({"url": "http://localhost:5001/events"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "serviceId is required");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_requires_url() {
    let app = test_app(2);

    let (status, body) = post_json(app.clone(), "/register", json!({"serviceId": "svc"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "url is required");

    // Empty strings count as missing
    let (status, _) = post_json(app, "/register", json!({"serviceId": "svc", "url": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_requires_type_and_payload() {
    let app = test_app(2);

    let (status, body) = post_json(app.clone(), "/events", json!({"payload": {"a": 1}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "type is required");

    let (status, body) = post_json(app.clone(), "/events", json!({"type": "user.created"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "payload is required");

    let (status, _) = post_json(
        app.clone(),
        "/events",
        json!({"type": "user.created", "payload": null}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-null falsy payloads are accepted
    let (status, _) = post_json(
        app,
        "/events",
        json!({"type": "user.created", "payload": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_response_shape() {
    let app = test_app(2);

    let (status, body) = post_json(
        app,
        "/register",
        json!({"serviceId": "profile-service", "url": "http://localhost:5001/events"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "registered");
    assert_eq!(body["delivered"], 0);
    assert_eq!(body["subscriber"]["serviceId"], "profile-service");
    assert_eq!(body["subscriber"]["url"], "http://localhost:5001/events");
    assert_eq!(body["subscriber"]["checkpoint"], -1);
    assert_eq!(body["subscriber"]["status"], "online");
}

#[tokio::test]
async fn test_publish_and_event_listing() {
    let app = test_app(2);

    let (status, body) = post_json(
        app.clone(),
        "/events",
        json!({"type": "user.created", "payload": {"name": "An"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "event processed");
    assert_eq!(body["event"]["id"], 0);
    assert_eq!(body["event"]["type"], "user.created");
    assert_eq!(body["event"]["payload"]["name"], "An");
    assert_eq!(body["delivered"], json!([]));
    assert_eq!(body["failed"], json!([]));

    let (status, body) = get(app, "/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["id"], 0);
}

#[tokio::test]
async fn test_subscribers_listing_is_sorted() {
    let app = test_app(2);
    post_json(
        app.clone(),
        "/register",
        json!({"serviceId": "b-svc", "url": "http://localhost:5002/events"}),
    )
    .await;
    post_json(
        app.clone(),
        "/register",
        json!({"serviceId": "a-svc", "url": "http://localhost:5001/events"}),
    )
    .await;

    let (status, body) = get(app, "/subscribers").await;

    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["serviceId"], "a-svc");
    assert_eq!(list[1]["serviceId"], "b-svc");
}

#[tokio::test]
async fn test_full_flow_over_http() {
    let sink = StubSink::start(StatusCode::OK).await;
    let app = test_app(2);

    let (status, _) = post_json(
        app.clone(),
        "/register",
        json!({"serviceId": "svc", "url": sink.url.clone()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        app.clone(),
        "/events",
        json!({"type": "user.created", "payload": {"id": 7}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivered"], json!(["svc"]));
    assert_eq!(sink.received_ids(), vec![0]);

    let (_, body) = get(app, "/subscribers").await;
    assert_eq!(body[0]["checkpoint"], 0);
    assert_eq!(body[0]["status"], "online");
}

#[tokio::test]
async fn test_register_replays_backlog_over_http() {
    let app = test_app(2);
    post_json(app.clone(), "/events", json!({"type": "tick", "payload": 0})).await;
    post_json(app.clone(), "/events", json!({"type": "tick", "payload": 1})).await;

    let sink = StubSink::start(StatusCode::OK).await;
    let (status, body) = post_json(
        app,
        "/register",
        json!({"serviceId": "late-svc", "url": sink.url.clone()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "registered, 2 backlog events delivered");
    assert_eq!(body["delivered"], 2);
    assert_eq!(body["subscriber"]["checkpoint"], 1);
    assert_eq!(sink.received_ids(), vec![0, 1]);
}
