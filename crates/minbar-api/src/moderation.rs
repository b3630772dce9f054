use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use minbar_types::api::{BannedResponse, ListQuery, UpdateReportStatusRequest};
use minbar_types::models::{NewReport, NewUserBan};

use crate::AppState;

pub async fn create_report(
    State(state): State<AppState>,
    Json(req): Json<NewReport>,
) -> Result<impl IntoResponse, StatusCode> {
    // A report may reference reported content, but never both kinds at once.
    if req.post_id.is_some() && req.dua_request_id.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let report = state
        .storage
        .create_report(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(state.storage.get_reports(query.limit))
}

pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReportStatusRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let report = state
        .storage
        .update_report_status(&id, req.status, req.admin_notes.as_deref())
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(report))
}

pub async fn ban_user(
    State(state): State<AppState>,
    Json(req): Json<NewUserBan>,
) -> Result<impl IntoResponse, StatusCode> {
    let ban = state
        .storage
        .ban_user(req)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(ban)))
}

pub async fn get_user_bans(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(state.storage.get_user_bans(&id))
}

pub async fn is_user_banned(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let banned = state.storage.is_user_banned(&id);
    Json(BannedResponse { banned })
}
