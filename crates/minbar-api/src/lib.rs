//! Route registration for the Minbar API. Handlers are thin adapters over
//! the storage facade: payloads arrive validated in shape, the facade's
//! per-class error policy maps straight to status codes (missing record →
//! 404, failed critical write → 500, swallowed failure → negative flag in a
//! 200 body).

pub mod comments;
pub mod communities;
pub mod duas;
pub mod engagement;
pub mod events;
pub mod health;
pub mod moderation;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};

use minbar_db::Storage;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub storage: Storage,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", post(users::create_user))
        .route("/api/users/{id}", get(users::get_user).put(users::update_user))
        .route(
            "/api/users/by-username/{username}",
            get(users::get_user_by_username),
        )
        .route("/api/users/by-email/{email}", get(users::get_user_by_email))
        .route("/api/users/{id}/bans", get(moderation::get_user_bans))
        .route("/api/users/{id}/banned", get(moderation::is_user_banned))
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/{id}",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route("/api/posts/{id}/comments", get(comments::get_post_comments))
        .route(
            "/api/duas",
            get(duas::list_dua_requests).post(duas::create_dua_request),
        )
        .route("/api/duas/{id}", get(duas::get_dua_request))
        .route("/api/duas/{id}/comments", get(comments::get_dua_comments))
        .route("/api/comments", post(comments::create_comment))
        .route("/api/likes", get(engagement::get_user_like))
        .route("/api/likes/toggle", post(engagement::toggle_like))
        .route("/api/bookmarks", get(engagement::get_user_bookmark))
        .route("/api/bookmarks/toggle", post(engagement::toggle_bookmark))
        .route(
            "/api/communities",
            get(communities::list_communities).post(communities::create_community),
        )
        .route(
            "/api/communities/{id}/members",
            post(communities::join_community),
        )
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route("/api/events/{id}/attendees", post(events::attend_event))
        .route(
            "/api/reports",
            get(moderation::list_reports).post(moderation::create_report),
        )
        .route(
            "/api/reports/{id}/status",
            put(moderation::update_report_status),
        )
        .route("/api/bans", post(moderation::ban_user))
        .route("/api/health", get(health::health))
        .route("/api/status", get(health::status))
        .with_state(state)
}
