use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::api::{ListQuery, MembershipRequest};
use minbar_types::models::NewEvent;

use crate::AppState;

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(state.storage.get_events(query.limit))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<NewEvent>,
) -> Result<impl IntoResponse, StatusCode> {
    let event = state
        .storage
        .create_event(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn attend_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MembershipRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let attendee = state
        .storage
        .attend_event(&id, &req.user_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(attendee)))
}
