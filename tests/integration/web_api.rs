//! HTTP API flows against the mock gateway.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use kvg_rgb::color::Rgb;
use kvg_rgb::gateway::mock::MockGateway;
use kvg_rgb::web::{AppState, build_app};

use crate::common::{fast_runner, mock_controller};

fn app() -> (Arc<MockGateway>, Arc<AppState>, Router) {
    let (mock, controller) = mock_controller();
    let state = Arc::new(AppState::new(Arc::new(fast_runner(controller))));
    let app = build_app(Arc::clone(&state), None);
    (mock, state, app)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test(flavor = "multi_thread")]
async fn zone_effect_then_color_releases_the_effect() {
    let (mock, state, app) = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/zone/effect",
        Some(json!({"device": 1, "zone": 0, "effect": {"type": "rainbow", "speed": 2}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["effect_id"].is_u64());
    assert_eq!(body["preference"]["effect"]["type"], "rainbow");

    let (_, body) = call(&app, "GET", "/api/effects", None).await;
    assert_eq!(body["effects"].as_array().unwrap().len(), 1);

    let (status, _) = call(
        &app,
        "POST",
        "/api/zone/color",
        Some(json!({"device": 1, "zone": 0, "r": 255, "g": 0, "b": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, "GET", "/api/effects", None).await;
    assert!(body["effects"].as_array().unwrap().is_empty());
    assert!(mock.zone_colors(1, 0).iter().all(|c| *c == Rgb::RED));

    let (_, body) = call(&app, "GET", "/api/devices", None).await;
    let zone = &body["devices"][1]["zones"][0];
    assert_eq!(zone["effect"]["type"], "static");
    assert_eq!(zone["color"], json!({"r": 255, "g": 0, "b": 0}));

    state.runner.stop_all();
}

#[tokio::test(flavor = "multi_thread")]
async fn timed_rainbow_and_stop_by_id() {
    let (_mock, _state, app) = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/effect/rainbow",
        Some(json!({"device": 1, "duration": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["effect"]["id"].as_u64().unwrap();
    assert_eq!(body["effect"]["zones"].as_array().unwrap().len(), 4);

    let (status, body) = call(&app, "POST", "/api/effect/stop", Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = call(&app, "POST", "/api/effect/stop", Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test(flavor = "multi_thread")]
async fn rename_and_resize_round_trip() {
    let (_mock, _state, app) = app();

    let (status, _) = call(
        &app,
        "POST",
        "/api/zone/rename",
        Some(json!({"device": 0, "zone": 1, "name": "  Desk strip "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        "POST",
        "/api/zone/resize",
        Some(json!({"device": 0, "zone": 1, "size": 45})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["actual"], 45);
    assert_eq!(body["previous"], 30);

    let (_, body) = call(&app, "GET", "/api/devices", None).await;
    let zone = &body["devices"][0]["zones"][1];
    assert_eq!(zone["display_name"], "Desk strip");
    assert_eq!(zone["led_count"], 45);

    let (status, body) = call(
        &app,
        "POST",
        "/api/zone/resize",
        Some(json!({"device": 0, "zone": 1, "size": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test(flavor = "multi_thread")]
async fn gateway_outage_is_service_unavailable() {
    let (mock, _state, app) = app();
    mock.disconnect();

    let (status, body) = call(&app, "GET", "/api/devices", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "gateway_unavailable");

    let (status, body) = call(&app, "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);

    mock.reconnect();
    let (status, _) = call(&app, "GET", "/api/devices", None).await;
    assert_eq!(status, StatusCode::OK);
}
