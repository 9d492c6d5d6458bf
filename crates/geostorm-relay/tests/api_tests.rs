//! Integration tests for the relay HTTP routes.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use geostorm_relay::router::build_router;
use geostorm_relay::state::RelayState;
use serde_json::Value;
use tower::ServiceExt;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/public");

fn make_test_state() -> Arc<RelayState> {
    Arc::new(RelayState::new("Mozilla", FIXTURES))
}

async fn body_to_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_to_bytes(body).await).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_status_with_no_clients() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/api/relay/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["sensor"]["connected"], false);
    assert_eq!(json["viewer"]["connected"], false);
    assert_eq!(json["sensor"]["accepted"], 0);
    assert_eq!(json["messages_forwarded"], 0);
    assert_eq!(json["messages_dropped"], 0);
    assert!(json["viewer"]["connection_id"].is_null());
}

#[tokio::test]
async fn test_status_counts_dropped_messages() {
    let state = make_test_state();
    state
        .forward(
            geostorm_types::ClientRole::Sensor,
            geostorm_types::ConnectionId::new(),
            axum::extract::ws::Message::Text("{}".into()),
        )
        .await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/relay/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["messages_dropped"], 1);
}

#[tokio::test]
async fn test_index_served_from_static_dir() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.contains("text/html"));
    let body = String::from_utf8(body_to_bytes(response.into_body()).await).unwrap();
    assert!(body.contains("earth-wrapper"));
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(
            Request::get("/textures/missing.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ws_route_requires_upgrade() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/ws").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cors_headers_present() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(
            Request::get("/api/relay/status")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
