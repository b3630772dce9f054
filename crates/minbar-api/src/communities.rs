use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::api::{ListQuery, MembershipRequest};
use minbar_types::models::NewCommunity;

use crate::AppState;

pub async fn list_communities(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(state.storage.get_communities(query.limit))
}

pub async fn create_community(
    State(state): State<AppState>,
    Json(req): Json<NewCommunity>,
) -> Result<impl IntoResponse, StatusCode> {
    let community = state
        .storage
        .create_community(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn join_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MembershipRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let member = state
        .storage
        .join_community(&id, &req.user_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(member)))
}
