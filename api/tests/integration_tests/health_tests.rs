//! Integration tests for the health check.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "clarice-api");
}

#[tokio::test]
async fn test_health_does_not_touch_store() {
    // An empty store fails reads but the service is still up.
    let (app, _store) = test_app();

    let (status, _) = get(app.clone(), "/update").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}
