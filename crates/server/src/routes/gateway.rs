//! Gateway endpoints: channel provisioning and batch record ingest.
//!
//! This is the surface external producers talk to instead of the broker
//! protocol: provision a channel, then post record batches to it.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use channel::{Broker, ChannelSpec, ProducerRecord};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::stations::AppState;

/// Content types accepted for record batches.
const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["application/vnd.kafka.json", "application/json"];

// -- Request types --

#[derive(Deserialize)]
pub struct PublishRequest {
    pub records: Vec<PublishRecord>,
}

#[derive(Deserialize)]
pub struct PublishRecord {
    #[serde(default)]
    pub key: Option<serde_json::Value>,
    pub value: serde_json::Value,
}

// -- Response types --

#[derive(Serialize)]
pub struct PublishResponse {
    pub offsets: Vec<OffsetResponse>,
}

#[derive(Serialize)]
pub struct OffsetResponse {
    pub partition: u32,
    pub offset: i64,
}

// -- Handlers --

/// POST /topics — ensure a channel exists with the posted spec.
#[tracing::instrument(skip(state, spec), fields(channel = %spec.name))]
pub async fn create_topic<B: Broker>(
    State(state): State<Arc<AppState<B>>>,
    Json(spec): Json<ChannelSpec>,
) -> Result<StatusCode, ApiError> {
    state.provisioner.ensure(&spec).await?;
    Ok(StatusCode::OK)
}

/// POST /topics/{topic} — append a batch of records to a channel.
///
/// The declared content type must identify JSON-serialized records;
/// anything else is rejected with 415 before the body is parsed.
pub async fn publish<B: Broker>(
    State(state): State<Arc<AppState<B>>>,
    Path(topic): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PublishResponse>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !ACCEPTED_CONTENT_TYPES
        .iter()
        .any(|accepted| content_type.starts_with(accepted))
    {
        return Err(ApiError::UnsupportedMediaType(content_type.to_string()));
    }

    let request: PublishRequest = serde_json::from_slice(&body)
        .map_err(|err| ApiError::BadRequest(format!("invalid record batch: {err}")))?;

    let mut offsets = Vec::with_capacity(request.records.len());
    for record in request.records {
        let (partition, offset) = state
            .broker
            .publish(&topic, ProducerRecord::from_parts(record.key, record.value))
            .await?;
        offsets.push(OffsetResponse {
            partition: partition.as_u32(),
            offset: offset.as_i64(),
        });
    }

    metrics::counter!("gateway_records_ingested").increment(offsets.len() as u64);
    Ok(Json(PublishResponse { offsets }))
}
