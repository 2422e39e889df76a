//! Integration tests for the latest value endpoint.
//!
//! Tests cover:
//! - The default series and the documented response shape
//! - The sample offset and its upper bound
//! - Unknown series, unknown values, and empty stores

use axum::http::StatusCode;
use serde_json::json;
use shared::models::{ReadingDocument, Timestamp};

use super::common::{get, get_with_headers, seeded_app, test_app, LAST_UPDATE};

#[tokio::test]
async fn test_update_returns_exact_document() {
    let (app, store) = test_app();
    store
        .record("sensor1", Timestamp::from_secs(1_699_999_997), 21.5)
        .unwrap();
    store
        .record("sensor1", Timestamp::from_secs(1_700_000_000), 22.0)
        .unwrap();

    let (status, response) = get(app, "/update?name=sensor1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({"data": {"name": "sensor1", "t": "1699999997", "value": "21.5"}})
    );
}

#[tokio::test]
async fn test_update_without_name_reads_sensor1() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/update").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["name"], "sensor1");
    assert_eq!(response["data"]["t"], (LAST_UPDATE - 3).to_string());
    assert_eq!(response["data"]["value"], "25.7");
}

#[tokio::test]
async fn test_update_second_sensor() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/update?name=sensor2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["name"], "sensor2");
    assert_eq!(response["data"]["value"], "97");
}

#[tokio::test]
async fn test_update_is_json() {
    let (app, _store) = seeded_app();

    let (status, headers, _) = get_with_headers(app, "/update").await;
    assert_eq!(status, StatusCode::OK);

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    assert!(content_type.is_some_and(|ct| ct.contains("application/json")));
}

#[tokio::test]
async fn test_update_never_reports_future_time() {
    let (app, _store) = seeded_app();

    for name in ["sensor1", "sensor2"] {
        let (_, response) = get(app.clone(), &format!("/update?name={name}")).await;
        let t: i64 = response["data"]["t"].as_str().unwrap().parse().unwrap();
        assert!(t <= LAST_UPDATE, "{name} reported t={t}");
    }
}

#[tokio::test]
async fn test_update_response_deserializes() {
    let (app, _store) = seeded_app();

    let (_, response) = get(app, "/update?name=sensor2").await;
    let document: ReadingDocument = serde_json::from_value(response).unwrap();
    assert_eq!(document.data.name.as_str(), "sensor2");
    assert_eq!(document.data.t, Timestamp::from_secs(LAST_UPDATE - 3));
    assert_eq!(document.data.value.as_deref(), Some("97"));
}

#[tokio::test]
async fn test_update_unknown_series_is_404() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/update?name=sensor9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "series_not_found");
    assert!(response["message"].as_str().unwrap().contains("sensor9"));
}

#[tokio::test]
async fn test_update_rejects_hostile_names() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/update?name=sensor1%3BAVERAGE%20XPORT").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "series_not_found");
}

#[tokio::test]
async fn test_update_unknown_value_is_null() {
    let (app, store) = test_app();
    // sensor2 gets no sample near the read instant.
    store
        .record("sensor2", Timestamp::from_secs(LAST_UPDATE - 30), 1.0)
        .unwrap();
    store
        .record("sensor1", Timestamp::from_secs(LAST_UPDATE), 1.0)
        .unwrap();

    let (status, response) = get(app, "/update?name=sensor2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["t"], (LAST_UPDATE - 3).to_string());
    assert!(response["data"]["value"].is_null());
}

#[tokio::test]
async fn test_update_on_empty_store_is_bad_gateway() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/update").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "store_unavailable");
}

#[tokio::test]
async fn test_update_follows_new_samples() {
    let (app, store) = seeded_app();

    store
        .record("sensor1", Timestamp::from_secs(LAST_UPDATE + 3), 30.0)
        .unwrap();

    let (_, response) = get(app, "/update").await;
    assert_eq!(response["data"]["t"], LAST_UPDATE.to_string());
    assert_eq!(response["data"]["value"], "26");
}

#[tokio::test]
async fn test_update_repeated_name_is_json_error() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/update?name=sensor1&name=sensor2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_query");
}
