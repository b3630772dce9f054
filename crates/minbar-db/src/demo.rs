//! In-memory fallback data used when no database is configured or a live
//! query fails. Seeded with a couple of recognizable records so the feed is
//! never empty in demo deployments.
//!
//! Demo-mode writes land in these collections so later demo-mode reads see
//! them — the two operating modes stay behaviorally interchangeable for
//! callers. Bans are the one deliberate exception: demo mode never stores
//! them and always answers "not banned".

use chrono::{Duration, Utc};
use minbar_types::models::{
    Bookmark, CommentWithAuthor, CommunityMember, CommunityWithOwner, DuaRequestWithAuthor,
    EventAttendee, EventWithOwner, Like, Post, PostWithAuthor, Report, User, UserRole,
};

pub const DEMO_USER_ID: &str = "8c661c6c-04a2-4323-a63a-895886883f7c";
pub const DEMO_ADMIN_ID: &str = "550e8400-e29b-41d4-a716-446655440002";

pub struct DemoData {
    pub users: Vec<User>,
    pub posts: Vec<PostWithAuthor>,
    pub dua_requests: Vec<DuaRequestWithAuthor>,
    pub comments: Vec<CommentWithAuthor>,
    pub likes: Vec<Like>,
    pub bookmarks: Vec<Bookmark>,
    pub communities: Vec<CommunityWithOwner>,
    pub community_members: Vec<CommunityMember>,
    pub events: Vec<EventWithOwner>,
    pub event_attendees: Vec<EventAttendee>,
    pub reports: Vec<Report>,
}

impl DemoData {
    pub fn seed() -> Self {
        let now = Utc::now();

        let demo_user = User {
            id: DEMO_USER_ID.to_string(),
            email: "demo@minbar.app".to_string(),
            name: "Demo User".to_string(),
            username: "demo_user".to_string(),
            avatar_url: None,
            bio: Some("Minbar demo user".to_string()),
            location: Some("Istanbul".to_string()),
            website: None,
            verified: true,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };

        let admin_user = User {
            id: DEMO_ADMIN_ID.to_string(),
            email: "admin@minbar.app".to_string(),
            name: "Admin User".to_string(),
            username: "admin".to_string(),
            avatar_url: None,
            bio: Some("Minbar demo admin".to_string()),
            location: Some("Istanbul".to_string()),
            website: None,
            verified: true,
            role: UserRole::Admin,
            created_at: now,
            updated_at: now,
        };

        let posts = vec![
            PostWithAuthor {
                post: Post {
                    id: "demo-post-1".to_string(),
                    user_id: demo_user.id.clone(),
                    content: "Assalamu alaikum, brothers and sisters! Welcome to the community."
                        .to_string(),
                    media_url: None,
                    category: Some("Greetings".to_string()),
                    tags: vec!["demo".to_string(), "salam".to_string()],
                    likes_count: 15,
                    comments_count: 3,
                    shares_count: 2,
                    created_at: now - Duration::hours(1),
                    updated_at: now - Duration::hours(1),
                },
                author: Some(demo_user.clone()),
            },
            PostWithAuthor {
                post: Post {
                    id: "demo-post-2".to_string(),
                    user_id: admin_user.id.clone(),
                    content: "As the platform admin I invite everyone to share beneficial knowledge here."
                        .to_string(),
                    media_url: None,
                    category: Some("Announcements".to_string()),
                    tags: vec![
                        "announcement".to_string(),
                        "welcome".to_string(),
                        "platform".to_string(),
                    ],
                    likes_count: 28,
                    comments_count: 7,
                    shares_count: 5,
                    created_at: now - Duration::hours(2),
                    updated_at: now - Duration::hours(2),
                },
                author: Some(admin_user.clone()),
            },
        ];

        Self {
            users: vec![demo_user, admin_user],
            posts,
            dua_requests: Vec::new(),
            comments: Vec::new(),
            likes: Vec::new(),
            bookmarks: Vec::new(),
            communities: Vec::new(),
            community_members: Vec::new(),
            events: Vec::new(),
            event_attendees: Vec::new(),
            reports: Vec::new(),
        }
    }

    /// Author record for a demo-mode insert; falls back to the seeded demo
    /// user so a feed row is never authorless.
    pub fn author(&self, user_id: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .or(self.users.first())
            .cloned()
    }
}

/// Demo-mode identifier: `demo-<kind>-<millis>`, matching nothing a live
/// database would ever hand out.
pub fn demo_id(kind: &str) -> String {
    format!("demo-{}-{}", kind, Utc::now().timestamp_millis())
}
