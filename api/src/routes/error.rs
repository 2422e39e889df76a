//! Error responses shared by the sensor routes.

use axum::{extract::rejection::QueryRejection, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::query::ReadingError;
use shared::storage::StoreError;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Error half of every sensor handler's result.
pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Builds an error response.
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Maps a query string the handler could not deserialize.
pub fn query_rejection(rejection: &QueryRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Query string rejected");
    error_response(rejection.status(), "invalid_query", rejection.body_text())
}

/// Maps a failed read to its HTTP response.
pub fn reading_error(err: &ReadingError) -> ApiError {
    let (status, code) = match err {
        ReadingError::Store(store) => store_status(store),
        ReadingError::NoSeries => (StatusCode::BAD_REQUEST, "no_series"),
        ReadingError::InvalidWindow(_) => (StatusCode::BAD_REQUEST, "invalid_window"),
    };

    if status.is_server_error() {
        tracing::warn!(%status, error = %err, "Sensor read failed");
    } else {
        tracing::debug!(%status, error = %err, "Sensor read refused");
    }

    error_response(status, code, err.to_string())
}

fn store_status(err: &StoreError) -> (StatusCode, &'static str) {
    match err {
        StoreError::SeriesNotFound(_) => (StatusCode::NOT_FOUND, "series_not_found"),
        StoreError::Unavailable(_) => (StatusCode::BAD_GATEWAY, "store_unavailable"),
        StoreError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "store_timeout"),
        StoreError::Malformed(_) => (StatusCode::BAD_GATEWAY, "malformed_response"),
        StoreError::Rejected(_) => (StatusCode::BAD_REQUEST, "store_rejected"),
        StoreError::LockError => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
    }
}
