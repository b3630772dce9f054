//! Route-layer tests against a demo-mode storage, driven with oneshot
//! requests so no socket is bound.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use minbar_api::{AppStateInner, router};
use minbar_db::Storage;

fn demo_app() -> Router {
    router(Arc::new(AppStateInner {
        storage: Storage::new(None),
    }))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_and_status_in_demo_mode() {
    let app = demo_app();

    let res = app.clone().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({ "healthy": true }));

    let res = app.oneshot(get("/api/status")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status = json_body(res).await;
    assert_eq!(status["database"]["status"], "demo-mode");
    assert_eq!(status["server"]["status"], "active");
}

#[tokio::test]
async fn create_post_appears_first_in_feed() {
    let app = demo_app();

    let res = app
        .clone()
        .oneshot(post_json(
            "/api/posts",
            json!({
                "user_id": "8c661c6c-04a2-4323-a63a-895886883f7c",
                "content": "fresh from the test suite"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = json_body(res).await;
    assert_eq!(created["likes_count"], 0);

    let res = app.clone().oneshot(get("/api/posts")).await.unwrap();
    let feed = json_body(res).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 3);
    assert_eq!(feed[0]["id"], created["id"]);

    let res = app.oneshot(get("/api/posts?limit=1")).await.unwrap();
    let limited = json_body(res).await;
    assert_eq!(limited.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_post_maps_to_404() {
    let app = demo_app();
    let res = app.oneshot(get("/api/posts/no-such-post")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_like_alternates_over_http() {
    let app = demo_app();
    let body = json!({
        "user_id": "8c661c6c-04a2-4323-a63a-895886883f7c",
        "post_id": "demo-post-1"
    });

    let res = app
        .clone()
        .oneshot(post_json("/api/likes/toggle", body.clone()))
        .await
        .unwrap();
    assert_eq!(json_body(res).await, json!({ "liked": true }));

    let res = app
        .clone()
        .oneshot(post_json("/api/likes/toggle", body))
        .await
        .unwrap();
    assert_eq!(json_body(res).await, json!({ "liked": false }));
}

#[tokio::test]
async fn toggle_rejects_ambiguous_target() {
    let app = demo_app();

    let both = json!({
        "user_id": "u1",
        "post_id": "p1",
        "dua_request_id": "d1"
    });
    let res = app
        .clone()
        .oneshot(post_json("/api/likes/toggle", both))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let neither = json!({ "user_id": "u1" });
    let res = app
        .oneshot(post_json("/api/bookmarks/toggle", neither))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_user_then_fetch_by_username() {
    let app = demo_app();

    let res = app
        .clone()
        .oneshot(post_json(
            "/api/users",
            json!({
                "email": "test@example.com",
                "name": "Test User",
                "username": "test_user"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(get("/api/users/by-username/test_user"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let user = json_body(res).await;
    assert_eq!(user["email"], "test@example.com");
    assert_eq!(user["role"], "user");
}
