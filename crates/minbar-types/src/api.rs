use serde::{Deserialize, Serialize};

use crate::models::ReportStatus;

// -- Engagement --

/// Body for the like/bookmark toggle routes. Exactly one of `post_id` /
/// `dua_request_id` is expected; the route layer validates that before the
/// storage layer sees it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleRequest {
    pub user_id: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub dua_request_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleBookmarkResponse {
    pub bookmarked: bool,
}

// -- Membership --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MembershipRequest {
    pub user_id: String,
}

// -- Moderation --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateReportStatusRequest {
    pub status: ReportStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BannedResponse {
    pub banned: bool,
}

// -- Health --

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

// -- List queries --

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}
