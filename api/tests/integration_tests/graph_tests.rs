//! Integration tests for the status board graph endpoint.

use axum::http::StatusCode;

use super::common::{get, seeded_app, test_app, LAST_UPDATE};

#[tokio::test]
async fn test_graph_default_document() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/graph").await;
    assert_eq!(status, StatusCode::OK);

    let graph = &response["graph"];
    assert_eq!(graph["title"], "Clarice");
    assert_eq!(graph["type"], "line");

    let sequences = graph["datasequences"].as_array().unwrap();
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0]["title"], "sensor1");
    assert_eq!(sequences[1]["title"], "sensor2");
    assert_eq!(sequences[1]["refreshEveryNSeconds"], "15");
}

#[tokio::test]
async fn test_graph_points_truncate_values() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/graph?series=sensor1&window=10&step=1").await;
    assert_eq!(status, StatusCode::OK);

    let points = response["graph"]["datasequences"][0]["datapoints"]
        .as_array()
        .unwrap();
    assert_eq!(points.len(), 11);

    let last = points.last().unwrap();
    assert_eq!(last["title"], LAST_UPDATE.to_string());
    // 26.0 truncates to 26, 25.9 to 25.
    assert_eq!(last["value"], 26);
    assert_eq!(points[points.len() - 2]["value"], 25);
}

#[tokio::test]
async fn test_graph_max_consolidation() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/graph?series=sensor2&window=10&step=2&cf=max").await;
    assert_eq!(status, StatusCode::OK);

    let points = response["graph"]["datasequences"][0]["datapoints"]
        .as_array()
        .unwrap();
    assert_eq!(points.len(), 6);
    // Last row covers 99 and 100.
    let last = points.last().unwrap();
    assert_eq!(last["title"], LAST_UPDATE.to_string());
    assert_eq!(last["value"], 100);
}

#[tokio::test]
async fn test_graph_skips_unknown_points() {
    let (app, _store) = seeded_app();

    // The window reaches back before the first seeded sample.
    let (status, response) = get(app, "/graph?series=sensor1&window=120&step=1").await;
    assert_eq!(status, StatusCode::OK);

    let points = response["graph"]["datasequences"][0]["datapoints"]
        .as_array()
        .unwrap();
    assert_eq!(points.len(), 61);
}

#[tokio::test]
async fn test_graph_errors() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app.clone(), "/graph?series=sensor9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "series_not_found");

    let (status, response) = get(app.clone(), "/graph?cf=median").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_consolidation");

    let (status, response) = get(app, "/graph?window=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_window");
}

#[tokio::test]
async fn test_graph_rejects_unbounded_window() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app.clone(), "/graph?window=18446744073709551615&step=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_window");

    // The router still serves after the bad request.
    let (status, _) = get(app, "/graph").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_graph_unparseable_query_is_json() {
    let (app, _store) = seeded_app();

    let (status, response) = get(app, "/graph?step=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_query");
}

#[tokio::test]
async fn test_graph_on_empty_store_is_bad_gateway() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/graph").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "store_unavailable");
}
