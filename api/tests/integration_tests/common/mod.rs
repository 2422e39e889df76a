//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::Timestamp;
use shared::storage::InMemorySensorStore;
use std::sync::Arc;

/// Last update time of the seeded store.
pub const LAST_UPDATE: i64 = 1_700_000_000;

/// Creates a test router over an in-memory store holding `sensor1` and `sensor2`.
///
/// # Returns
///
/// A tuple containing the configured router and the store, so tests can
/// record samples after the router is built.
pub fn test_app() -> (Router, InMemorySensorStore) {
    let store = InMemorySensorStore::with_series(["sensor1", "sensor2"]);
    let state = AppState::with_store(Arc::new(store.clone()));
    (create_router(state), store)
}

/// Creates a test router whose store has a minute of samples for both sensors,
/// ending at [`LAST_UPDATE`].
///
/// `sensor1` reads `20 + i / 10` and `sensor2` reads `40 + i` at `LAST_UPDATE - 60 + i`.
pub fn seeded_app() -> (Router, InMemorySensorStore) {
    let (app, store) = test_app();
    for i in 0..=60 {
        let t = Timestamp::from_secs(LAST_UPDATE - 60 + i);
        #[allow(clippy::cast_precision_loss)]
        let step = i as f64;
        store.record("sensor1", t, 20.0 + step / 10.0).unwrap();
        store.record("sensor2", t, 40.0 + step).unwrap();
    }
    (app, store)
}

/// Helper to make a GET request.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _headers, json) = get_with_headers(app, uri).await;
    (status, json)
}

/// Helper to make a GET request and keep the response headers.
pub async fn get_with_headers(app: Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, headers, json)
}
