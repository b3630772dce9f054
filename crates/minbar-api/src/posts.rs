use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::api::{DeletedResponse, ListQuery};
use minbar_types::models::NewPost;

use crate::AppState;

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(state.storage.get_posts(query.limit))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let post = state
        .storage
        .get_post_by_id(&id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<NewPost>,
) -> Result<impl IntoResponse, StatusCode> {
    let post = state
        .storage
        .create_post(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let deleted = state.storage.delete_post(&id);
    Json(DeletedResponse { deleted })
}
