use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifiers are opaque strings: live rows get UUIDv4 strings, demo rows
/// get `demo-<kind>-<millis>` ids. Callers never parse them.
#[derive(Debug, Error)]
#[error("unrecognized {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(ParseEnumError { kind: "role", value: other.to_string() }),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(ParseEnumError { kind: "report status", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanType {
    Temporary,
    Permanent,
}

impl BanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BanType::Temporary => "temporary",
            BanType::Permanent => "permanent",
        }
    }
}

impl FromStr for BanType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temporary" => Ok(BanType::Temporary),
            "permanent" => Ok(BanType::Permanent),
            other => Err(ParseEnumError { kind: "ban type", value: other.to_string() }),
        }
    }
}

// -- Entities --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub verified: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub media_url: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    // Denormalized counters: advisory only, never recomputed by the storage
    // layer, so they can drift from the true dependent-row counts.
    pub likes_count: i64,
    pub comments_count: i64,
    pub shares_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuaRequest {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub category: Option<String>,
    pub is_anonymous: bool,
    pub prayers_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Belongs to exactly one of {post, dua request}; the schema enforces the
/// exactly-one rule with a CHECK constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub post_id: Option<String>,
    pub dua_request_id: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub post_id: Option<String>,
    pub dua_request_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub post_id: Option<String>,
    pub dua_request_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: String,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityMember {
    pub id: String,
    pub community_id: String,
    pub user_id: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_by: String,
    pub attendees_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAttendee {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub reported_user_id: String,
    pub post_id: Option<String>,
    pub dua_request_id: Option<String>,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBan {
    pub id: String,
    pub user_id: String,
    pub banned_by: Option<String>,
    pub reason: String,
    pub ban_type: BanType,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserBan {
    /// A ban is in effect iff it is active and either permanent or not yet
    /// past its expiry.
    pub fn in_effect(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && match self.ban_type {
                BanType::Permanent => true,
                BanType::Temporary => self.expires_at.map(|at| at > now).unwrap_or(false),
            }
    }
}

// -- Joined record shapes --
// Feed reads left-join the author; a dangling user_id yields `author: None`.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuaRequestWithAuthor {
    #[serde(flatten)]
    pub dua_request: DuaRequest,
    pub author: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityWithOwner {
    #[serde(flatten)]
    pub community: Community,
    pub owner: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWithOwner {
    #[serde(flatten)]
    pub event: Event,
    pub owner: Option<User>,
}

/// Moderation-queue row: a report plus the looked-up parties and the
/// reported content, when it still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub reporter: Option<User>,
    pub reported_user: Option<User>,
    pub post: Option<Post>,
    pub dua_request: Option<DuaRequest>,
}

// -- Insert payloads --
// Already validated by the route layer; the storage layer fills ids,
// counters, and timestamps.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Partial update: only the provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDuaRequest {
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub user_id: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub dua_request_id: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommunity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub reporter_id: String,
    pub reported_user_id: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub dua_request_id: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserBan {
    pub user_id: String,
    #[serde(default)]
    pub banned_by: Option<String>,
    pub reason: String,
    pub ban_type: BanType,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ban(ban_type: BanType, expires_at: Option<DateTime<Utc>>, is_active: bool) -> UserBan {
        UserBan {
            id: "ban-1".into(),
            user_id: "user-1".into(),
            banned_by: None,
            reason: "spam".into(),
            ban_type,
            expires_at,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn permanent_ban_ignores_expiry() {
        let now = Utc::now();
        let expired = now - Duration::hours(1);
        assert!(ban(BanType::Permanent, Some(expired), true).in_effect(now));
        assert!(ban(BanType::Permanent, None, true).in_effect(now));
    }

    #[test]
    fn inactive_ban_never_in_effect() {
        let now = Utc::now();
        let future = now + Duration::hours(1);
        assert!(!ban(BanType::Permanent, None, false).in_effect(now));
        assert!(!ban(BanType::Temporary, Some(future), false).in_effect(now));
    }

    #[test]
    fn temporary_ban_lapses_at_expiry() {
        let now = Utc::now();
        assert!(ban(BanType::Temporary, Some(now + Duration::minutes(5)), true).in_effect(now));
        assert!(!ban(BanType::Temporary, Some(now - Duration::minutes(5)), true).in_effect(now));
        // No expiry on a temporary ban means it has already lapsed.
        assert!(!ban(BanType::Temporary, None, true).in_effect(now));
    }

    #[test]
    fn enum_round_trips() {
        for s in ["user", "admin"] {
            assert_eq!(s.parse::<UserRole>().unwrap().as_str(), s);
        }
        for s in ["pending", "resolved", "dismissed"] {
            assert_eq!(s.parse::<ReportStatus>().unwrap().as_str(), s);
        }
        for s in ["temporary", "permanent"] {
            assert_eq!(s.parse::<BanType>().unwrap().as_str(), s);
        }
        assert!("forever".parse::<BanType>().is_err());
    }
}
