//! HTTP surface for the transit stream pipeline.
//!
//! One axum application serves both sides of the system: the gateway
//! (channel provisioning and record ingest for external producers) and
//! the query side (point lookups against the materialized station
//! table), with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use channel::{Broker, Provisioner};
use metrics_exporter_prometheus::PrometheusHandle;
use pipeline::StationTable;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::stations::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<B: Broker + Clone + 'static>(
    state: Arc<AppState<B>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/stations", get(routes::stations::list::<B>))
        .route("/stations/{id}", get(routes::stations::get::<B>))
        .route("/topics", post(routes::gateway::create_topic::<B>))
        .route("/topics/{topic}", post(routes::gateway::publish::<B>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state around a broker.
///
/// Returns the state plus the station table so the caller can hand the
/// same view to the transformer agent.
pub fn create_default_state<B: Broker + Clone>(broker: B) -> (Arc<AppState<B>>, StationTable) {
    let table = StationTable::new();
    let provisioner = Arc::new(Provisioner::new(broker.clone()));

    let state = Arc::new(AppState {
        broker,
        table: table.clone(),
        provisioner,
    });

    (state, table)
}
