//! Latest sensor value endpoint.
//!
//! `GET /update?name=<sensor>` answers with the value recorded a few seconds
//! before the store's last update, wrapped as `{"data": {...}}`.

use super::error::{query_rejection, reading_error, ApiError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use shared::models::{ReadingDocument, SensorName};
use shared::query::latest_reading;

/// Query parameters for the latest value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    /// Series to read; `sensor1` when absent or empty.
    pub name: Option<String>,
}

/// Creates the latest value routes.
pub fn update_routes(state: AppState) -> Router {
    Router::new()
        .route("/update", get(latest_update))
        .with_state(state)
}

async fn latest_update(
    State(state): State<AppState>,
    params: Result<Query<UpdateParams>, QueryRejection>,
) -> Result<Json<ReadingDocument>, ApiError> {
    let Query(params) = params.map_err(|e| query_rejection(&e))?;
    let name = SensorName::from_param(params.name.as_deref());
    let offset = state.reading_config().sample_offset_secs;

    let reading = latest_reading(state.store(), &name, offset)
        .await
        .map_err(|e| reading_error(&e))?;

    Ok(Json(reading.into()))
}
