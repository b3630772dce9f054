//! Storage facade tests: demo mode against the in-memory store, live mode
//! against throwaway SQLite databases. Failure-injection tests use a side
//! connection to the same file to break the schema out from under the
//! facade.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use chrono::Utc;
use rusqlite::Connection;

use minbar_db::{Database, Storage};
use minbar_types::models::{
    BanType, NewComment, NewCommunity, NewDuaRequest, NewEvent, NewPost, NewReport, NewUser,
    NewUserBan, Post, ReportStatus, User, UserPatch,
};

fn demo_storage() -> Storage {
    Storage::new(None)
}

fn mem_storage() -> Storage {
    Storage::new(Some(Database::open(Path::new(":memory:")).unwrap()))
}

/// File-backed storage plus a raw side connection for breaking things.
fn file_storage(name: &str) -> (Storage, Connection, PathBuf) {
    let path = std::env::temp_dir().join(format!(
        "minbar_storage_test_{}_{}.db",
        name,
        std::process::id()
    ));
    let _ = fs::remove_file(&path);
    let _ = fs::remove_file(path.with_extension("db-wal"));
    let _ = fs::remove_file(path.with_extension("db-shm"));
    let storage = Storage::new(Some(Database::open(&path).unwrap()));
    let side = Connection::open(&path).unwrap();
    (storage, side, path)
}

fn seed_user(storage: &Storage, username: &str) -> User {
    storage
        .create_user(NewUser {
            email: format!("{username}@example.com"),
            name: username.to_string(),
            username: username.to_string(),
            avatar_url: None,
            bio: None,
            location: None,
            website: None,
        })
        .unwrap()
}

fn seed_post(storage: &Storage, user_id: &str, content: &str) -> Post {
    storage
        .create_post(NewPost {
            user_id: user_id.to_string(),
            content: content.to_string(),
            media_url: None,
            category: None,
            tags: vec![],
        })
        .unwrap()
}

// -- Demo mode --

#[test]
fn demo_user_round_trip() {
    let storage = demo_storage();
    assert!(storage.demo_mode());

    let created = seed_user(&storage, "aisha");
    assert!(created.id.starts_with("demo-user-"));

    let by_username = storage.get_user_by_username("aisha").unwrap();
    assert_eq!(by_username.id, created.id);

    let by_email = storage.get_user_by_email("aisha@example.com").unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(storage.get_user_by_username("nobody").is_none());
}

#[test]
fn demo_update_user_patches_only_given_fields() {
    let storage = demo_storage();
    let user = seed_user(&storage, "bilal");

    let updated = storage
        .update_user(
            &user.id,
            UserPatch {
                bio: Some("Muezzin".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Muezzin"));
    assert_eq!(updated.username, "bilal");

    assert!(storage.update_user("missing", UserPatch::default()).unwrap().is_none());
}

#[test]
fn demo_create_post_prepends_with_zeroed_counters() {
    let storage = demo_storage();

    // Two seeded demo posts.
    let seeded = storage.get_posts(None);
    assert_eq!(seeded.len(), 2);

    let post = seed_post(&storage, &seeded[0].post.user_id, "new thoughts");
    assert_eq!(post.likes_count, 0);
    assert_eq!(post.comments_count, 0);
    assert_eq!(post.shares_count, 0);

    let feed = storage.get_posts(None);
    assert_eq!(feed.len(), 3);
    assert_eq!(feed[0].post.id, post.id);
    assert!(feed[0].author.is_some());

    // Limit is respected.
    assert_eq!(storage.get_posts(Some(1)).len(), 1);
}

#[test]
fn demo_delete_post_reports_outcome() {
    let storage = demo_storage();
    assert!(storage.delete_post("demo-post-1"));
    assert!(!storage.delete_post("demo-post-1"));
    assert_eq!(storage.get_posts(None).len(), 1);
}

#[test]
fn demo_toggle_like_alternates() {
    let storage = demo_storage();
    let user = "8c661c6c-04a2-4323-a63a-895886883f7c";

    assert!(storage.toggle_like(user, Some("demo-post-1"), None));
    assert!(storage.get_user_like(user, Some("demo-post-1"), None).is_some());

    assert!(!storage.toggle_like(user, Some("demo-post-1"), None));
    assert!(storage.get_user_like(user, Some("demo-post-1"), None).is_none());

    assert!(storage.toggle_like(user, Some("demo-post-1"), None));
}

#[test]
fn demo_toggle_bookmark_alternates() {
    let storage = demo_storage();
    let user = "8c661c6c-04a2-4323-a63a-895886883f7c";

    assert!(storage.toggle_bookmark(user, Some("demo-post-2"), None));
    assert!(!storage.toggle_bookmark(user, Some("demo-post-2"), None));
    assert!(storage.get_user_bookmark(user, Some("demo-post-2"), None).is_none());
}

#[test]
fn demo_comments_visible_after_create() {
    let storage = demo_storage();
    let comment = storage
        .create_comment(NewComment {
            user_id: "8c661c6c-04a2-4323-a63a-895886883f7c".to_string(),
            post_id: Some("demo-post-1".to_string()),
            dua_request_id: None,
            content: "Wa alaikum assalam!".to_string(),
        })
        .unwrap();

    let comments = storage.get_comments_by_post_id("demo-post-1");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.id, comment.id);
    assert!(comments[0].author.is_some());

    assert!(storage.get_comments_by_post_id("demo-post-2").is_empty());
}

#[test]
fn demo_dua_request_round_trip() {
    let storage = demo_storage();
    assert!(storage.get_dua_requests(None).is_empty());

    let dua = storage
        .create_dua_request(NewDuaRequest {
            user_id: "8c661c6c-04a2-4323-a63a-895886883f7c".to_string(),
            content: "Please pray for my exams".to_string(),
            category: Some("Study".to_string()),
            is_anonymous: false,
        })
        .unwrap();
    assert_eq!(dua.prayers_count, 0);

    let listed = storage.get_dua_requests(None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].dua_request.id, dua.id);
    assert_eq!(
        storage.get_dua_request_by_id(&dua.id).unwrap().dua_request.id,
        dua.id
    );
}

#[test]
fn demo_reports_enriched_from_demo_store() {
    let storage = demo_storage();
    let report = storage
        .create_report(NewReport {
            reporter_id: "8c661c6c-04a2-4323-a63a-895886883f7c".to_string(),
            reported_user_id: "550e8400-e29b-41d4-a716-446655440002".to_string(),
            post_id: Some("demo-post-2".to_string()),
            dua_request_id: None,
            reason: "spam".to_string(),
            description: None,
        })
        .unwrap();
    assert_eq!(report.status, ReportStatus::Pending);

    let queue = storage.get_reports(None);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].reporter.as_ref().unwrap().username, "demo_user");
    assert_eq!(queue[0].reported_user.as_ref().unwrap().username, "admin");
    assert_eq!(queue[0].post.as_ref().unwrap().id, "demo-post-2");
    assert!(queue[0].dua_request.is_none());

    let resolved = storage
        .update_report_status(&report.id, ReportStatus::Resolved, Some("handled"))
        .unwrap();
    assert_eq!(resolved.status, ReportStatus::Resolved);
    assert_eq!(resolved.admin_notes.as_deref(), Some("handled"));

    assert!(storage
        .update_report_status("missing", ReportStatus::Dismissed, None)
        .is_none());
}

#[test]
fn demo_bans_unsupported() {
    let storage = demo_storage();
    let ban = storage
        .ban_user(NewUserBan {
            user_id: "8c661c6c-04a2-4323-a63a-895886883f7c".to_string(),
            banned_by: None,
            reason: "testing".to_string(),
            ban_type: BanType::Permanent,
            expires_at: None,
        })
        .unwrap();
    assert!(ban.id.starts_with("demo-ban-"));
    assert!(ban.is_active);

    // Demo mode never tracks bans.
    assert!(!storage.is_user_banned(&ban.user_id));
    assert!(storage.get_user_bans(&ban.user_id).is_empty());
}

#[test]
fn demo_communities_and_events() {
    let storage = demo_storage();

    let community = storage
        .create_community(NewCommunity {
            name: "Quran Study".to_string(),
            description: None,
            category: Some("Education".to_string()),
            created_by: "8c661c6c-04a2-4323-a63a-895886883f7c".to_string(),
        })
        .unwrap();
    assert_eq!(community.member_count, 1);
    assert_eq!(storage.get_communities(None)[0].community.id, community.id);

    let member = storage
        .join_community(&community.id, "550e8400-e29b-41d4-a716-446655440002")
        .unwrap();
    assert_eq!(member.role, "member");

    let event = storage
        .create_event(NewEvent {
            title: "Iftar gathering".to_string(),
            description: None,
            location_name: Some("Community center".to_string()),
            starts_at: Utc::now() + chrono::Duration::days(7),
            created_by: "550e8400-e29b-41d4-a716-446655440002".to_string(),
        })
        .unwrap();
    assert_eq!(event.attendees_count, 0);
    assert_eq!(storage.get_events(None)[0].event.id, event.id);

    let attendee = storage
        .attend_event(&event.id, "8c661c6c-04a2-4323-a63a-895886883f7c")
        .unwrap();
    assert_eq!(attendee.event_id, event.id);
}

#[test]
fn demo_status_and_health() {
    let storage = demo_storage();
    let status = storage.status();
    assert_eq!(status.database.status, "demo-mode");
    assert!(!status.database.enabled);
    assert!(status.server.enabled);
    assert!(storage.check_health());
}

// -- Live mode --

#[test]
fn live_user_round_trip() {
    let storage = mem_storage();
    assert!(!storage.demo_mode());

    let created = seed_user(&storage, "fatima");
    assert!(storage.get_user(&created.id).is_some());
    assert_eq!(
        storage.get_user_by_username("fatima").unwrap().id,
        created.id
    );
    assert_eq!(
        storage.get_user_by_email("fatima@example.com").unwrap().id,
        created.id
    );

    let updated = storage
        .update_user(
            &created.id,
            UserPatch {
                location: Some("Ankara".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.location.as_deref(), Some("Ankara"));
    assert_eq!(updated.email, created.email);

    assert!(storage
        .update_user("missing", UserPatch::default())
        .unwrap()
        .is_none());
}

#[test]
fn live_posts_ordered_and_limited() {
    let storage = mem_storage();
    let user = seed_user(&storage, "omar");

    let p1 = seed_post(&storage, &user.id, "first");
    sleep(Duration::from_millis(3));
    let p2 = seed_post(&storage, &user.id, "second");
    sleep(Duration::from_millis(3));
    let p3 = seed_post(&storage, &user.id, "third");

    let feed = storage.get_posts(None);
    let ids: Vec<&str> = feed.iter().map(|p| p.post.id.as_str()).collect();
    assert_eq!(ids, vec![p3.id.as_str(), p2.id.as_str(), p1.id.as_str()]);
    assert_eq!(feed[0].author.as_ref().unwrap().username, "omar");

    let limited = storage.get_posts(Some(2));
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].post.id, p3.id);

    let fetched = storage.get_post_by_id(&p2.id).unwrap();
    assert_eq!(fetched.post.content, "second");
    assert!(storage.get_post_by_id("missing").is_none());
}

#[test]
fn live_toggle_like_alternates() {
    let storage = mem_storage();
    let user = seed_user(&storage, "zaynab");
    let post = seed_post(&storage, &user.id, "like me");

    assert!(storage.toggle_like(&user.id, Some(&post.id), None));
    let like = storage.get_user_like(&user.id, Some(&post.id), None).unwrap();
    assert_eq!(like.post_id.as_deref(), Some(post.id.as_str()));

    assert!(!storage.toggle_like(&user.id, Some(&post.id), None));
    assert!(storage.get_user_like(&user.id, Some(&post.id), None).is_none());

    assert!(storage.toggle_like(&user.id, Some(&post.id), None));
}

#[test]
fn live_toggle_bookmark_on_dua_request() {
    let storage = mem_storage();
    let user = seed_user(&storage, "yusuf");
    let dua = storage
        .create_dua_request(NewDuaRequest {
            user_id: user.id.clone(),
            content: "dua for health".to_string(),
            category: None,
            is_anonymous: true,
        })
        .unwrap();

    assert!(storage.toggle_bookmark(&user.id, None, Some(&dua.id)));
    assert!(storage
        .get_user_bookmark(&user.id, None, Some(&dua.id))
        .is_some());
    assert!(!storage.toggle_bookmark(&user.id, None, Some(&dua.id)));
}

#[test]
fn live_comments_on_both_targets() {
    let storage = mem_storage();
    let user = seed_user(&storage, "hamza");
    let post = seed_post(&storage, &user.id, "discuss");
    let dua = storage
        .create_dua_request(NewDuaRequest {
            user_id: user.id.clone(),
            content: "dua".to_string(),
            category: None,
            is_anonymous: false,
        })
        .unwrap();

    storage
        .create_comment(NewComment {
            user_id: user.id.clone(),
            post_id: Some(post.id.clone()),
            dua_request_id: None,
            content: "on the post".to_string(),
        })
        .unwrap();
    storage
        .create_comment(NewComment {
            user_id: user.id.clone(),
            post_id: None,
            dua_request_id: Some(dua.id.clone()),
            content: "ameen".to_string(),
        })
        .unwrap();

    let post_comments = storage.get_comments_by_post_id(&post.id);
    assert_eq!(post_comments.len(), 1);
    assert_eq!(post_comments[0].comment.content, "on the post");
    assert_eq!(post_comments[0].author.as_ref().unwrap().id, user.id);

    let dua_comments = storage.get_comments_by_dua_request_id(&dua.id);
    assert_eq!(dua_comments.len(), 1);
    assert_eq!(dua_comments[0].comment.content, "ameen");
}

#[test]
fn live_ban_evaluation_truth_table() {
    let (storage, side, _path) = file_storage("bans");
    let user = seed_user(&storage, "banned_one");

    // Permanent ban: in effect regardless of expiry.
    let permanent = storage
        .ban_user(NewUserBan {
            user_id: user.id.clone(),
            banned_by: None,
            reason: "abuse".to_string(),
            ban_type: BanType::Permanent,
            expires_at: Some(Utc::now() - chrono::Duration::days(1)),
        })
        .unwrap();
    assert!(storage.is_user_banned(&user.id));
    assert_eq!(storage.get_user_bans(&user.id).len(), 1);

    // Deactivated: no longer in effect.
    side.execute(
        "UPDATE user_bans SET is_active = 0 WHERE id = ?1",
        [&permanent.id],
    )
    .unwrap();
    assert!(!storage.is_user_banned(&user.id));
    assert!(storage.get_user_bans(&user.id).is_empty());

    // Temporary ban with a future expiry: in effect.
    let temporary = storage
        .ban_user(NewUserBan {
            user_id: user.id.clone(),
            banned_by: None,
            reason: "cooldown".to_string(),
            ban_type: BanType::Temporary,
            expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        })
        .unwrap();
    assert!(storage.is_user_banned(&user.id));

    // Lapsed temporary ban: active flag still set, but expired.
    side.execute(
        "UPDATE user_bans SET expires_at = ?1 WHERE id = ?2",
        rusqlite::params![Utc::now() - chrono::Duration::hours(1), temporary.id],
    )
    .unwrap();
    assert!(!storage.is_user_banned(&user.id));
}

#[test]
fn live_reports_batched_enrichment() {
    let storage = mem_storage();
    let reporter = seed_user(&storage, "watchful");
    let offender = seed_user(&storage, "troublemaker");
    let post = seed_post(&storage, &offender.id, "questionable");

    storage
        .create_report(NewReport {
            reporter_id: reporter.id.clone(),
            reported_user_id: offender.id.clone(),
            post_id: Some(post.id.clone()),
            dua_request_id: None,
            reason: "inappropriate".to_string(),
            description: Some("please review".to_string()),
        })
        .unwrap();
    // A report against the user directly, no content attached.
    let direct = storage
        .create_report(NewReport {
            reporter_id: reporter.id.clone(),
            reported_user_id: offender.id.clone(),
            post_id: None,
            dua_request_id: None,
            reason: "harassment".to_string(),
            description: None,
        })
        .unwrap();

    let queue = storage.get_reports(None);
    assert_eq!(queue.len(), 2);
    for detail in &queue {
        assert_eq!(detail.reporter.as_ref().unwrap().id, reporter.id);
        assert_eq!(detail.reported_user.as_ref().unwrap().id, offender.id);
    }
    let with_post = queue
        .iter()
        .find(|d| d.report.post_id.is_some())
        .unwrap();
    assert_eq!(with_post.post.as_ref().unwrap().id, post.id);

    let updated = storage
        .update_report_status(&direct.id, ReportStatus::Dismissed, Some("no evidence"))
        .unwrap();
    assert_eq!(updated.status, ReportStatus::Dismissed);
    assert!(storage
        .update_report_status("missing", ReportStatus::Resolved, None)
        .is_none());
}

#[test]
fn live_communities_and_events() {
    let storage = mem_storage();
    let owner = seed_user(&storage, "founder");

    let community = storage
        .create_community(NewCommunity {
            name: "Tafsir Circle".to_string(),
            description: Some("Weekly tafsir".to_string()),
            category: None,
            created_by: owner.id.clone(),
        })
        .unwrap();
    let listed = storage.get_communities(None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner.as_ref().unwrap().id, owner.id);

    let joiner = seed_user(&storage, "student");
    let member = storage.join_community(&community.id, &joiner.id).unwrap();
    assert_eq!(member.community_id, community.id);

    let event = storage
        .create_event(NewEvent {
            title: "Eid prayer".to_string(),
            description: None,
            location_name: Some("Main hall".to_string()),
            starts_at: Utc::now() + chrono::Duration::days(3),
            created_by: owner.id.clone(),
        })
        .unwrap();
    assert_eq!(storage.get_events(None)[0].owner.as_ref().unwrap().id, owner.id);

    let attendee = storage.attend_event(&event.id, &joiner.id).unwrap();
    assert_eq!(attendee.user_id, joiner.id);
}

// -- Failure handling --

#[test]
fn live_read_failure_falls_back_to_demo_data() {
    let (storage, side, _path) = file_storage("read_fallback");
    let user = seed_user(&storage, "khalid");
    seed_post(&storage, &user.id, "will vanish");

    side.execute_batch("DROP TABLE posts").unwrap();

    // Same shape as demo-mode get_posts, no error surfaces.
    let feed = storage.get_posts(None);
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|p| p.post.id.starts_with("demo-post-")));

    assert!(storage.get_post_by_id("demo-post-1").is_some());
}

#[test]
fn live_create_failure_propagates() {
    let (storage, side, _path) = file_storage("create_fails");
    let user = seed_user(&storage, "maryam");

    side.execute_batch("DROP TABLE posts").unwrap();

    let result = storage.create_post(NewPost {
        user_id: user.id.clone(),
        content: "doomed".to_string(),
        media_url: None,
        category: None,
        tags: vec![],
    });
    assert!(result.is_err());
}

#[test]
fn live_delete_and_toggle_failures_swallowed() {
    let (storage, side, _path) = file_storage("swallowed");
    let user = seed_user(&storage, "salim");
    let post = seed_post(&storage, &user.id, "short-lived");

    side.execute_batch("DROP TABLE likes; DROP TABLE posts;").unwrap();

    assert!(!storage.delete_post(&post.id));
    assert!(!storage.toggle_like(&user.id, Some(&post.id), None));
}

#[test]
fn live_health_reflects_database_state() {
    let (storage, side, _path) = file_storage("health");
    assert!(storage.check_health());
    assert_eq!(storage.status().database.status, "connected");

    side.execute_batch("DROP TABLE users").unwrap();
    assert!(!storage.check_health());
    // Status stays a pure mode descriptor, no I/O.
    assert_eq!(storage.status().database.status, "connected");
}
