use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::models::{NewUser, UserPatch};

use crate::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .storage
        .create_user(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state.storage.get_user(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(user))
}

pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .storage
        .get_user_by_username(&username)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(user))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .storage
        .get_user_by_email(&email)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .storage
        .update_user(&id, patch)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(user))
}
