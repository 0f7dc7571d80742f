//! Station table query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use channel::{Broker, Provisioner};
use common::StationId;
use pipeline::StationTable;
use stations::TransformedStation;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<B: Broker> {
    pub broker: B,
    pub table: StationTable,
    pub provisioner: Arc<Provisioner<B>>,
}

/// GET /stations — all enriched stations, ordered by sequence position.
pub async fn list<B: Broker>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<Vec<TransformedStation>> {
    Json(state.table.all().await)
}

/// GET /stations/{id} — latest enriched record for one station.
pub async fn get<B: Broker>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<i64>,
) -> Result<Json<TransformedStation>, ApiError> {
    state
        .table
        .get(StationId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("station {id} not found")))
}
