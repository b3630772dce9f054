use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::api::{ToggleBookmarkResponse, ToggleLikeResponse, ToggleRequest};

use crate::AppState;

fn validate_target(req: &ToggleRequest) -> Result<(), StatusCode> {
    // Exactly one of {post, dua request}.
    if req.post_id.is_some() == req.dua_request_id.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(())
}

pub async fn get_user_like(
    State(state): State<AppState>,
    Query(query): Query<ToggleRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let like = state
        .storage
        .get_user_like(
            &query.user_id,
            query.post_id.as_deref(),
            query.dua_request_id.as_deref(),
        )
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(like))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    validate_target(&req)?;
    let liked = state.storage.toggle_like(
        &req.user_id,
        req.post_id.as_deref(),
        req.dua_request_id.as_deref(),
    );
    Ok(Json(ToggleLikeResponse { liked }))
}

pub async fn get_user_bookmark(
    State(state): State<AppState>,
    Query(query): Query<ToggleRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let bookmark = state
        .storage
        .get_user_bookmark(
            &query.user_id,
            query.post_id.as_deref(),
            query.dua_request_id.as_deref(),
        )
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(bookmark))
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    validate_target(&req)?;
    let bookmarked = state.storage.toggle_bookmark(
        &req.user_id,
        req.post_id.as_deref(),
        req.dua_request_id.as_deref(),
    );
    Ok(Json(ToggleBookmarkResponse { bookmarked }))
}
