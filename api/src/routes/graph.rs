//! Status board graph endpoint.
//!
//! `GET /graph` renders the trailing window of one or more series in the
//! graph document format consumed by status board widgets.

use super::error::{error_response, query_rejection, reading_error, ApiError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use shared::models::{GraphDocument, SensorName};
use shared::query::{graph_document, series_window, WindowQuery};
use shared::storage::ConsolidationFunction;
use validator::Validate;

/// Query parameters for the graph.
///
/// Every parameter is optional and falls back to the server's graph defaults.
#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    /// Comma separated series names.
    pub series: Option<String>,
    /// Window length in seconds.
    pub window: Option<u64>,
    /// Seconds between points.
    pub step: Option<u64>,
    /// Consolidation function (`average`, `min`, `max`, `last`).
    pub cf: Option<String>,
}

/// Creates the graph routes.
pub fn graph_routes(state: AppState) -> Router {
    Router::new()
        .route("/graph", get(status_board))
        .with_state(state)
}

async fn status_board(
    State(state): State<AppState>,
    params: Result<Query<GraphParams>, QueryRejection>,
) -> Result<Json<GraphDocument>, ApiError> {
    let Query(params) = params.map_err(|e| query_rejection(&e))?;
    let defaults = state.graph_config();

    // Requested window and step must stay within the configured graph bounds.
    let mut bounds = defaults.clone();
    bounds.window_secs = params.window.unwrap_or(defaults.window_secs);
    bounds.step_secs = params.step.unwrap_or(defaults.step_secs);
    bounds.validate().map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, "invalid_window", e.to_string())
    })?;

    let series: Vec<SensorName> = match params.series.as_deref() {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(SensorName::from)
            .collect(),
        None => defaults.series.iter().map(SensorName::new).collect(),
    };

    let function = match params.cf.as_deref() {
        Some(cf) => cf.parse::<ConsolidationFunction>().map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, "invalid_consolidation", e.to_string())
        })?,
        None => ConsolidationFunction::default(),
    };

    let query = WindowQuery::new(series, bounds.window_secs)
        .with_step(bounds.step_secs)
        .with_function(function);

    let windows = series_window(state.store(), &query)
        .await
        .map_err(|e| reading_error(&e))?;

    Ok(Json(graph_document(
        &defaults.title,
        defaults.refresh_secs,
        &windows,
    )))
}
