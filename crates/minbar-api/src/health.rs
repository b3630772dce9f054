use axum::{Json, extract::State, response::IntoResponse};

use minbar_types::api::HealthResponse;

use crate::AppState;

/// Never errors: a failing live probe reports `healthy: false` with a 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = state.storage.check_health();
    Json(HealthResponse { healthy })
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.storage.status())
}
