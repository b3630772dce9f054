//! Repository facade: one object, two mutually exclusive paths per method.
//!
//! With a configured database every call goes to SQLite; without one (or
//! when a live read fails) the same computation runs against the in-memory
//! demo store. Callers never branch on the active mode.
//!
//! Error policy, preserved from the system this replaces:
//! - reads never fail: a live error is logged and the demo thunk answers;
//! - creates and `update_user` rethrow, the route layer maps the failure;
//! - deletes, toggles and `update_report_status` swallow errors into a
//!   negative result.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use minbar_types::models::{
    Bookmark, Comment, CommentWithAuthor, Community, CommunityMember, CommunityWithOwner,
    DuaRequest, DuaRequestWithAuthor, Event, EventAttendee, EventWithOwner, Like, NewComment,
    NewCommunity, NewDuaRequest, NewEvent, NewPost, NewReport, NewUser, NewUserBan, Post,
    PostWithAuthor, Report, ReportDetail, ReportStatus, User, UserBan, UserPatch, UserRole,
};

use crate::demo::{DemoData, demo_id};
use crate::{Database, queries};

const DEFAULT_LIST_LIMIT: u32 = 50;

#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub status: &'static str,
    pub enabled: bool,
}

/// Synchronous status descriptor: mode flags only, no I/O.
#[derive(Debug, Serialize)]
pub struct StorageStatus {
    pub database: ComponentStatus,
    pub server: ComponentStatus,
}

pub struct Storage {
    db: Option<Database>,
    demo: Mutex<DemoData>,
}

impl Storage {
    /// The host application owns the provisioned connection and this
    /// facade's lifetime; there is no process-wide instance.
    pub fn new(db: Option<Database>) -> Self {
        if db.is_none() {
            info!("Storage running in demo mode");
        }
        Self {
            db,
            demo: Mutex::new(DemoData::seed()),
        }
    }

    pub fn demo_mode(&self) -> bool {
        self.db.is_none()
    }

    fn demo(&self) -> MutexGuard<'_, DemoData> {
        // Demo paths must stay infallible; a poisoned lock still holds
        // usable data.
        self.demo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -- Mode dispatch --
    // One combinator per error-policy class, so the fallback contract lives
    // in exactly one place per class instead of being restated in every
    // method.

    /// Reads: live failure is logged and the demo thunk answers instead.
    fn read<T>(
        &self,
        op: &'static str,
        live: impl FnOnce(&Database) -> Result<T>,
        demo: impl FnOnce(&mut DemoData) -> T,
    ) -> T {
        match &self.db {
            None => demo(&mut self.demo()),
            Some(db) => live(db).unwrap_or_else(|err| {
                error!(op, error = %err, "Database read failed, serving demo data");
                demo(&mut self.demo())
            }),
        }
    }

    /// Critical writes: live failure is logged and rethrown.
    fn write<T>(
        &self,
        op: &'static str,
        live: impl FnOnce(&Database) -> Result<T>,
        demo: impl FnOnce(&mut DemoData) -> T,
    ) -> Result<T> {
        match &self.db {
            None => Ok(demo(&mut self.demo())),
            Some(db) => live(db).inspect_err(|err| {
                error!(op, error = %err, "Database write failed");
            }),
        }
    }

    /// Destructive, idempotent-ish writes: live failure is logged and
    /// swallowed into the fallback value.
    fn write_or<T>(
        &self,
        op: &'static str,
        fallback: T,
        live: impl FnOnce(&Database) -> Result<T>,
        demo: impl FnOnce(&mut DemoData) -> T,
    ) -> T {
        match &self.db {
            None => demo(&mut self.demo()),
            Some(db) => live(db).unwrap_or_else(|err| {
                error!(op, error = %err, "Database write failed, reporting no-op");
                fallback
            }),
        }
    }

    // -- Users --

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.read(
            "get_user",
            |db| db.with_conn(|conn| queries::user_by_id(conn, id)),
            |demo| demo.users.iter().find(|u| u.id == id).cloned(),
        )
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.read(
            "get_user_by_username",
            |db| db.with_conn(|conn| queries::user_by_username(conn, username)),
            |demo| demo.users.iter().find(|u| u.username == username).cloned(),
        )
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.read(
            "get_user_by_email",
            |db| db.with_conn(|conn| queries::user_by_email(conn, email)),
            |demo| demo.users.iter().find(|u| u.email == email).cloned(),
        )
    }

    pub fn create_user(&self, new_user: NewUser) -> Result<User> {
        let for_live = new_user.clone();
        self.write(
            "create_user",
            move |db| {
                let user = build_user(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_user(conn, &user))?;
                Ok(user)
            },
            move |demo| {
                let user = build_user(demo_id("user"), new_user);
                demo.users.push(user.clone());
                user
            },
        )
    }

    pub fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let now = Utc::now();
        let for_live = patch.clone();
        self.write(
            "update_user",
            move |db| db.with_conn(|conn| queries::update_user(conn, id, &for_live, now)),
            move |demo| {
                let user = demo.users.iter_mut().find(|u| u.id == id)?;
                apply_patch(user, patch, now);
                Some(user.clone())
            },
        )
    }

    // -- Posts --

    pub fn get_posts(&self, limit: Option<u32>) -> Vec<PostWithAuthor> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        self.read(
            "get_posts",
            |db| db.with_conn(|conn| queries::posts_with_authors(conn, limit)),
            |demo| demo.posts.iter().take(limit as usize).cloned().collect(),
        )
    }

    pub fn get_post_by_id(&self, id: &str) -> Option<PostWithAuthor> {
        self.read(
            "get_post_by_id",
            |db| db.with_conn(|conn| queries::post_by_id(conn, id)),
            |demo| demo.posts.iter().find(|p| p.post.id == id).cloned(),
        )
    }

    pub fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let for_live = new_post.clone();
        self.write(
            "create_post",
            move |db| {
                let post = build_post(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_post(conn, &post))?;
                Ok(post)
            },
            move |demo| {
                let post = build_post(demo_id("post"), new_post);
                let author = demo.author(&post.user_id);
                // Most-recent-first: new posts go to the front of the feed.
                demo.posts.insert(
                    0,
                    PostWithAuthor {
                        post: post.clone(),
                        author,
                    },
                );
                post
            },
        )
    }

    pub fn delete_post(&self, id: &str) -> bool {
        self.write_or(
            "delete_post",
            false,
            |db| db.with_conn(|conn| queries::delete_post(conn, id)),
            |demo| {
                let before = demo.posts.len();
                demo.posts.retain(|p| p.post.id != id);
                demo.posts.len() < before
            },
        )
    }

    // -- Dua requests --

    pub fn get_dua_requests(&self, limit: Option<u32>) -> Vec<DuaRequestWithAuthor> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        self.read(
            "get_dua_requests",
            |db| db.with_conn(|conn| queries::dua_requests_with_authors(conn, limit)),
            |demo| {
                demo.dua_requests
                    .iter()
                    .take(limit as usize)
                    .cloned()
                    .collect()
            },
        )
    }

    pub fn get_dua_request_by_id(&self, id: &str) -> Option<DuaRequestWithAuthor> {
        self.read(
            "get_dua_request_by_id",
            |db| db.with_conn(|conn| queries::dua_request_by_id(conn, id)),
            |demo| {
                demo.dua_requests
                    .iter()
                    .find(|d| d.dua_request.id == id)
                    .cloned()
            },
        )
    }

    pub fn create_dua_request(&self, new_dua: NewDuaRequest) -> Result<DuaRequest> {
        let for_live = new_dua.clone();
        self.write(
            "create_dua_request",
            move |db| {
                let dua = build_dua_request(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_dua_request(conn, &dua))?;
                Ok(dua)
            },
            move |demo| {
                let dua = build_dua_request(demo_id("dua"), new_dua);
                let author = demo.author(&dua.user_id);
                demo.dua_requests.insert(
                    0,
                    DuaRequestWithAuthor {
                        dua_request: dua.clone(),
                        author,
                    },
                );
                dua
            },
        )
    }

    // -- Comments --

    pub fn get_comments_by_post_id(&self, post_id: &str) -> Vec<CommentWithAuthor> {
        self.read(
            "get_comments_by_post_id",
            |db| db.with_conn(|conn| queries::comments_by_post(conn, post_id)),
            |demo| {
                demo.comments
                    .iter()
                    .filter(|c| c.comment.post_id.as_deref() == Some(post_id))
                    .cloned()
                    .collect()
            },
        )
    }

    pub fn get_comments_by_dua_request_id(&self, dua_request_id: &str) -> Vec<CommentWithAuthor> {
        self.read(
            "get_comments_by_dua_request_id",
            |db| db.with_conn(|conn| queries::comments_by_dua_request(conn, dua_request_id)),
            |demo| {
                demo.comments
                    .iter()
                    .filter(|c| c.comment.dua_request_id.as_deref() == Some(dua_request_id))
                    .cloned()
                    .collect()
            },
        )
    }

    pub fn create_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let for_live = new_comment.clone();
        self.write(
            "create_comment",
            move |db| {
                let comment = build_comment(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_comment(conn, &comment))?;
                Ok(comment)
            },
            move |demo| {
                let comment = build_comment(demo_id("comment"), new_comment);
                let author = demo.author(&comment.user_id);
                demo.comments.insert(
                    0,
                    CommentWithAuthor {
                        comment: comment.clone(),
                        author,
                    },
                );
                comment
            },
        )
    }

    // -- Likes --

    pub fn get_user_like(
        &self,
        user_id: &str,
        post_id: Option<&str>,
        dua_request_id: Option<&str>,
    ) -> Option<Like> {
        self.read(
            "get_user_like",
            |db| db.with_conn(|conn| queries::find_like(conn, user_id, post_id, dua_request_id)),
            |demo| {
                demo.likes
                    .iter()
                    .find(|l| {
                        mark_matches(
                            &l.user_id,
                            l.post_id.as_deref(),
                            l.dua_request_id.as_deref(),
                            user_id,
                            post_id,
                            dua_request_id,
                        )
                    })
                    .cloned()
            },
        )
    }

    /// Returns true when the like was added, false when removed.
    pub fn toggle_like(
        &self,
        user_id: &str,
        post_id: Option<&str>,
        dua_request_id: Option<&str>,
    ) -> bool {
        self.write_or(
            "toggle_like",
            false,
            |db| {
                db.with_conn(|conn| {
                    queries::toggle_mark(
                        conn,
                        "likes",
                        Uuid::new_v4().to_string(),
                        user_id,
                        post_id,
                        dua_request_id,
                    )
                })
            },
            |demo| {
                let existing = demo.likes.iter().position(|l| {
                    mark_matches(
                        &l.user_id,
                        l.post_id.as_deref(),
                        l.dua_request_id.as_deref(),
                        user_id,
                        post_id,
                        dua_request_id,
                    )
                });
                match existing {
                    Some(idx) => {
                        demo.likes.remove(idx);
                        false
                    }
                    None => {
                        demo.likes.push(Like {
                            id: demo_id("like"),
                            user_id: user_id.to_string(),
                            post_id: post_id.map(str::to_string),
                            dua_request_id: dua_request_id.map(str::to_string),
                            created_at: Utc::now(),
                        });
                        true
                    }
                }
            },
        )
    }

    // -- Bookmarks --

    pub fn get_user_bookmark(
        &self,
        user_id: &str,
        post_id: Option<&str>,
        dua_request_id: Option<&str>,
    ) -> Option<Bookmark> {
        self.read(
            "get_user_bookmark",
            |db| {
                db.with_conn(|conn| queries::find_bookmark(conn, user_id, post_id, dua_request_id))
            },
            |demo| {
                demo.bookmarks
                    .iter()
                    .find(|b| {
                        mark_matches(
                            &b.user_id,
                            b.post_id.as_deref(),
                            b.dua_request_id.as_deref(),
                            user_id,
                            post_id,
                            dua_request_id,
                        )
                    })
                    .cloned()
            },
        )
    }

    /// Returns true when the bookmark was added, false when removed.
    pub fn toggle_bookmark(
        &self,
        user_id: &str,
        post_id: Option<&str>,
        dua_request_id: Option<&str>,
    ) -> bool {
        self.write_or(
            "toggle_bookmark",
            false,
            |db| {
                db.with_conn(|conn| {
                    queries::toggle_mark(
                        conn,
                        "bookmarks",
                        Uuid::new_v4().to_string(),
                        user_id,
                        post_id,
                        dua_request_id,
                    )
                })
            },
            |demo| {
                let existing = demo.bookmarks.iter().position(|b| {
                    mark_matches(
                        &b.user_id,
                        b.post_id.as_deref(),
                        b.dua_request_id.as_deref(),
                        user_id,
                        post_id,
                        dua_request_id,
                    )
                });
                match existing {
                    Some(idx) => {
                        demo.bookmarks.remove(idx);
                        false
                    }
                    None => {
                        demo.bookmarks.push(Bookmark {
                            id: demo_id("bookmark"),
                            user_id: user_id.to_string(),
                            post_id: post_id.map(str::to_string),
                            dua_request_id: dua_request_id.map(str::to_string),
                            created_at: Utc::now(),
                        });
                        true
                    }
                }
            },
        )
    }

    // -- Communities --

    pub fn get_communities(&self, limit: Option<u32>) -> Vec<CommunityWithOwner> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        self.read(
            "get_communities",
            |db| db.with_conn(|conn| queries::communities_with_owners(conn, limit)),
            |demo| {
                demo.communities
                    .iter()
                    .take(limit as usize)
                    .cloned()
                    .collect()
            },
        )
    }

    pub fn create_community(&self, new_community: NewCommunity) -> Result<Community> {
        let for_live = new_community.clone();
        self.write(
            "create_community",
            move |db| {
                let community = build_community(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_community(conn, &community))?;
                Ok(community)
            },
            move |demo| {
                let community = build_community(demo_id("community"), new_community);
                let owner = demo.author(&community.created_by);
                demo.communities.insert(
                    0,
                    CommunityWithOwner {
                        community: community.clone(),
                        owner,
                    },
                );
                community
            },
        )
    }

    pub fn join_community(&self, community_id: &str, user_id: &str) -> Result<CommunityMember> {
        self.write(
            "join_community",
            |db| {
                let member = build_member(Uuid::new_v4().to_string(), community_id, user_id);
                db.with_conn(|conn| queries::insert_community_member(conn, &member))?;
                Ok(member)
            },
            |demo| {
                let member = build_member(demo_id("member"), community_id, user_id);
                demo.community_members.push(member.clone());
                member
            },
        )
    }

    // -- Events --

    pub fn get_events(&self, limit: Option<u32>) -> Vec<EventWithOwner> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        self.read(
            "get_events",
            |db| db.with_conn(|conn| queries::events_with_owners(conn, limit)),
            |demo| demo.events.iter().take(limit as usize).cloned().collect(),
        )
    }

    pub fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let for_live = new_event.clone();
        self.write(
            "create_event",
            move |db| {
                let event = build_event(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_event(conn, &event))?;
                Ok(event)
            },
            move |demo| {
                let event = build_event(demo_id("event"), new_event);
                let owner = demo.author(&event.created_by);
                demo.events.insert(
                    0,
                    EventWithOwner {
                        event: event.clone(),
                        owner,
                    },
                );
                event
            },
        )
    }

    pub fn attend_event(&self, event_id: &str, user_id: &str) -> Result<EventAttendee> {
        self.write(
            "attend_event",
            |db| {
                let attendee = build_attendee(Uuid::new_v4().to_string(), event_id, user_id);
                db.with_conn(|conn| queries::insert_event_attendee(conn, &attendee))?;
                Ok(attendee)
            },
            |demo| {
                let attendee = build_attendee(demo_id("attendee"), event_id, user_id);
                demo.event_attendees.push(attendee.clone());
                attendee
            },
        )
    }

    // -- Reports --

    pub fn create_report(&self, new_report: NewReport) -> Result<Report> {
        let for_live = new_report.clone();
        self.write(
            "create_report",
            move |db| {
                let report = build_report(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_report(conn, &report))?;
                Ok(report)
            },
            move |demo| {
                let report = build_report(demo_id("report"), new_report);
                demo.reports.insert(0, report.clone());
                report
            },
        )
    }

    /// Moderation queue: reports plus their parties and reported content.
    /// The party/content lookups are batched per entity kind, not wrapped in
    /// a transaction, so they can observe interleaved writes.
    pub fn get_reports(&self, limit: Option<u32>) -> Vec<ReportDetail> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        self.read(
            "get_reports",
            |db| {
                db.with_conn(|conn| {
                    let reports = queries::reports(conn, limit)?;

                    let user_ids: Vec<String> = collect_ids(reports.iter().flat_map(|r| {
                        [Some(r.reporter_id.clone()), Some(r.reported_user_id.clone())]
                    }));
                    let post_ids: Vec<String> =
                        collect_ids(reports.iter().map(|r| r.post_id.clone()));
                    let dua_ids: Vec<String> =
                        collect_ids(reports.iter().map(|r| r.dua_request_id.clone()));

                    let users = queries::users_by_ids(conn, &user_ids)?;
                    let posts = queries::posts_by_ids(conn, &post_ids)?;
                    let duas = queries::dua_requests_by_ids(conn, &dua_ids)?;

                    Ok(reports
                        .into_iter()
                        .map(|report| enrich_report(report, &users, &posts, &duas))
                        .collect())
                })
            },
            |demo| {
                let users = demo.users.clone();
                let posts: Vec<Post> = demo.posts.iter().map(|p| p.post.clone()).collect();
                let duas: Vec<DuaRequest> = demo
                    .dua_requests
                    .iter()
                    .map(|d| d.dua_request.clone())
                    .collect();
                demo.reports
                    .iter()
                    .take(limit as usize)
                    .cloned()
                    .map(|report| enrich_report(report, &users, &posts, &duas))
                    .collect()
            },
        )
    }

    pub fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        admin_notes: Option<&str>,
    ) -> Option<Report> {
        let now = Utc::now();
        self.write_or(
            "update_report_status",
            None,
            |db| {
                db.with_conn(|conn| {
                    queries::update_report_status(conn, report_id, status, admin_notes, now)
                })
            },
            |demo| {
                let report = demo.reports.iter_mut().find(|r| r.id == report_id)?;
                report.status = status;
                report.admin_notes = admin_notes.map(str::to_string);
                report.updated_at = now;
                Some(report.clone())
            },
        )
    }

    // -- Bans --
    // Demo mode does not track bans: `ban_user` synthesizes a record without
    // storing it, and the probes answer "no bans". A deliberate
    // simplification carried over from the system this replaces.

    pub fn ban_user(&self, new_ban: NewUserBan) -> Result<UserBan> {
        let for_live = new_ban.clone();
        self.write(
            "ban_user",
            move |db| {
                let ban = build_ban(Uuid::new_v4().to_string(), for_live);
                db.with_conn(|conn| queries::insert_ban(conn, &ban))?;
                Ok(ban)
            },
            move |_demo| build_ban(demo_id("ban"), new_ban),
        )
    }

    pub fn get_user_bans(&self, user_id: &str) -> Vec<UserBan> {
        self.read(
            "get_user_bans",
            |db| db.with_conn(|conn| queries::active_bans(conn, user_id)),
            |_demo| Vec::new(),
        )
    }

    pub fn is_user_banned(&self, user_id: &str) -> bool {
        let now = Utc::now();
        self.read(
            "is_user_banned",
            |db| {
                db.with_conn(|conn| {
                    let bans = queries::active_bans(conn, user_id)?;
                    Ok(bans.iter().any(|ban| ban.in_effect(now)))
                })
            },
            |_demo| false,
        )
    }

    // -- Health --

    pub fn status(&self) -> StorageStatus {
        let database = if self.demo_mode() {
            ComponentStatus {
                status: "demo-mode",
                enabled: false,
            }
        } else {
            ComponentStatus {
                status: "connected",
                enabled: true,
            }
        };
        StorageStatus {
            database,
            server: ComponentStatus {
                status: "active",
                enabled: true,
            },
        }
    }

    /// Never fails: a live probe error is reported as unhealthy, demo mode
    /// is always healthy.
    pub fn check_health(&self) -> bool {
        match &self.db {
            None => true,
            Some(db) => match db.with_conn(queries::ping) {
                Ok(()) => true,
                Err(err) => {
                    error!(error = %err, "Database health check failed");
                    false
                }
            },
        }
    }
}

// -- Record constructors --
// Shared by both paths; only the id differs between live and demo inserts.

fn build_user(id: String, new_user: NewUser) -> User {
    let now = Utc::now();
    User {
        id,
        email: new_user.email,
        name: new_user.name,
        username: new_user.username,
        avatar_url: new_user.avatar_url,
        bio: new_user.bio,
        location: new_user.location,
        website: new_user.website,
        verified: false,
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    }
}

fn build_post(id: String, new_post: NewPost) -> Post {
    let now = Utc::now();
    Post {
        id,
        user_id: new_post.user_id,
        content: new_post.content,
        media_url: new_post.media_url,
        category: new_post.category,
        tags: new_post.tags,
        likes_count: 0,
        comments_count: 0,
        shares_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn build_dua_request(id: String, new_dua: NewDuaRequest) -> DuaRequest {
    let now = Utc::now();
    DuaRequest {
        id,
        user_id: new_dua.user_id,
        content: new_dua.content,
        category: new_dua.category,
        is_anonymous: new_dua.is_anonymous,
        prayers_count: 0,
        comments_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn build_comment(id: String, new_comment: NewComment) -> Comment {
    let now = Utc::now();
    Comment {
        id,
        user_id: new_comment.user_id,
        post_id: new_comment.post_id,
        dua_request_id: new_comment.dua_request_id,
        content: new_comment.content,
        created_at: now,
        updated_at: now,
    }
}

fn build_community(id: String, new_community: NewCommunity) -> Community {
    let now = Utc::now();
    Community {
        id,
        name: new_community.name,
        description: new_community.description,
        category: new_community.category,
        created_by: new_community.created_by,
        member_count: 1,
        created_at: now,
        updated_at: now,
    }
}

fn build_member(id: String, community_id: &str, user_id: &str) -> CommunityMember {
    CommunityMember {
        id,
        community_id: community_id.to_string(),
        user_id: user_id.to_string(),
        role: "member".to_string(),
        joined_at: Utc::now(),
    }
}

fn build_event(id: String, new_event: NewEvent) -> Event {
    let now = Utc::now();
    Event {
        id,
        title: new_event.title,
        description: new_event.description,
        location_name: new_event.location_name,
        starts_at: new_event.starts_at,
        created_by: new_event.created_by,
        attendees_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn build_attendee(id: String, event_id: &str, user_id: &str) -> EventAttendee {
    EventAttendee {
        id,
        event_id: event_id.to_string(),
        user_id: user_id.to_string(),
        registered_at: Utc::now(),
    }
}

fn build_report(id: String, new_report: NewReport) -> Report {
    let now = Utc::now();
    Report {
        id,
        reporter_id: new_report.reporter_id,
        reported_user_id: new_report.reported_user_id,
        post_id: new_report.post_id,
        dua_request_id: new_report.dua_request_id,
        reason: new_report.reason,
        description: new_report.description,
        status: ReportStatus::Pending,
        admin_notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn build_ban(id: String, new_ban: NewUserBan) -> UserBan {
    UserBan {
        id,
        user_id: new_ban.user_id,
        banned_by: new_ban.banned_by,
        reason: new_ban.reason,
        ban_type: new_ban.ban_type,
        expires_at: new_ban.expires_at,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn apply_patch(user: &mut User, patch: UserPatch, now: DateTime<Utc>) {
    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(username) = patch.username {
        user.username = username;
    }
    if let Some(avatar_url) = patch.avatar_url {
        user.avatar_url = Some(avatar_url);
    }
    if let Some(bio) = patch.bio {
        user.bio = Some(bio);
    }
    if let Some(location) = patch.location {
        user.location = Some(location);
    }
    if let Some(website) = patch.website {
        user.website = Some(website);
    }
    user.updated_at = now;
}

/// Scoped (user, target) match: absent target filters are wildcards, given
/// ones must match exactly.
fn mark_matches(
    row_user: &str,
    row_post: Option<&str>,
    row_dua: Option<&str>,
    user_id: &str,
    post_id: Option<&str>,
    dua_request_id: Option<&str>,
) -> bool {
    row_user == user_id
        && post_id.is_none_or(|p| row_post == Some(p))
        && dua_request_id.is_none_or(|d| row_dua == Some(d))
}

fn collect_ids(ids: impl Iterator<Item = Option<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.flatten().filter(|id| seen.insert(id.clone())).collect()
}

fn enrich_report(
    report: Report,
    users: &[User],
    posts: &[Post],
    duas: &[DuaRequest],
) -> ReportDetail {
    let reporter = users.iter().find(|u| u.id == report.reporter_id).cloned();
    let reported_user = users
        .iter()
        .find(|u| u.id == report.reported_user_id)
        .cloned();
    let post = report
        .post_id
        .as_deref()
        .and_then(|id| posts.iter().find(|p| p.id == id).cloned());
    let dua_request = report
        .dua_request_id
        .as_deref()
        .and_then(|id| duas.iter().find(|d| d.id == id).cloned());

    ReportDetail {
        report,
        reporter,
        reported_user,
        post,
        dua_request,
    }
}
