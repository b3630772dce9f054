use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::api::ListQuery;
use minbar_types::models::NewDuaRequest;

use crate::AppState;

pub async fn list_dua_requests(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(state.storage.get_dua_requests(query.limit))
}

pub async fn get_dua_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let dua = state
        .storage
        .get_dua_request_by_id(&id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(dua))
}

pub async fn create_dua_request(
    State(state): State<AppState>,
    Json(req): Json<NewDuaRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let dua = state
        .storage
        .create_dua_request(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(dua)))
}
