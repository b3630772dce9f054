use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::models::NewComment;

use crate::AppState;

pub async fn get_post_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(state.storage.get_comments_by_post_id(&id))
}

pub async fn get_dua_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(state.storage.get_comments_by_dua_request_id(&id))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Json(req): Json<NewComment>,
) -> Result<impl IntoResponse, StatusCode> {
    // A comment targets exactly one of {post, dua request}.
    if req.post_id.is_some() == req.dua_request_id.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let comment = state
        .storage
        .create_comment(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(comment)))
}
