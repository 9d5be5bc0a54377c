use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use ember_shared::types::api::HealthResponse;

use crate::AppState;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("ember-matching", env!("CARGO_PKG_VERSION")))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
