//! Live-mode queries. Free functions over a borrowed connection, called by
//! the storage facade inside `Database::with_conn`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Row};

use minbar_types::models::{
    Bookmark, Comment, CommentWithAuthor, Community, CommunityMember, CommunityWithOwner,
    DuaRequest, DuaRequestWithAuthor, Event, EventAttendee, EventWithOwner, Like, Post,
    PostWithAuthor, Report, ReportStatus, User, UserBan, UserPatch,
};

const USER_COLS: &str =
    "id, email, name, username, avatar_url, bio, location, website, verified, role, \
     created_at, updated_at";

const POST_COLS: &str =
    "id, user_id, content, media_url, category, tags, likes_count, comments_count, \
     shares_count, created_at, updated_at";

const DUA_COLS: &str =
    "id, user_id, content, category, is_anonymous, prayers_count, comments_count, \
     created_at, updated_at";

// -- Row mappers --
// `base` is the column offset, so the same mapper serves plain selects and
// the joined feed queries.

fn conversion_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn user_at(row: &Row, base: usize) -> rusqlite::Result<User> {
    let role: String = row.get(base + 9)?;
    Ok(User {
        id: row.get(base)?,
        email: row.get(base + 1)?,
        name: row.get(base + 2)?,
        username: row.get(base + 3)?,
        avatar_url: row.get(base + 4)?,
        bio: row.get(base + 5)?,
        location: row.get(base + 6)?,
        website: row.get(base + 7)?,
        verified: row.get(base + 8)?,
        role: role.parse().map_err(|e| conversion_err(base + 9, e))?,
        created_at: row.get(base + 10)?,
        updated_at: row.get(base + 11)?,
    })
}

/// Joined author columns: all NULL when the left join found no user row.
fn opt_user_at(row: &Row, base: usize) -> rusqlite::Result<Option<User>> {
    match row.get::<_, Option<String>>(base)? {
        Some(_) => Ok(Some(user_at(row, base)?)),
        None => Ok(None),
    }
}

fn post_at(row: &Row, base: usize) -> rusqlite::Result<Post> {
    let tags_json: String = row.get(base + 5)?;
    Ok(Post {
        id: row.get(base)?,
        user_id: row.get(base + 1)?,
        content: row.get(base + 2)?,
        media_url: row.get(base + 3)?,
        category: row.get(base + 4)?,
        tags: serde_json::from_str(&tags_json).map_err(|e| conversion_err(base + 5, e))?,
        likes_count: row.get(base + 6)?,
        comments_count: row.get(base + 7)?,
        shares_count: row.get(base + 8)?,
        created_at: row.get(base + 9)?,
        updated_at: row.get(base + 10)?,
    })
}

fn dua_at(row: &Row, base: usize) -> rusqlite::Result<DuaRequest> {
    Ok(DuaRequest {
        id: row.get(base)?,
        user_id: row.get(base + 1)?,
        content: row.get(base + 2)?,
        category: row.get(base + 3)?,
        is_anonymous: row.get(base + 4)?,
        prayers_count: row.get(base + 5)?,
        comments_count: row.get(base + 6)?,
        created_at: row.get(base + 7)?,
        updated_at: row.get(base + 8)?,
    })
}

fn comment_at(row: &Row, base: usize) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(base)?,
        user_id: row.get(base + 1)?,
        post_id: row.get(base + 2)?,
        dua_request_id: row.get(base + 3)?,
        content: row.get(base + 4)?,
        created_at: row.get(base + 5)?,
        updated_at: row.get(base + 6)?,
    })
}

fn report_at(row: &Row) -> rusqlite::Result<Report> {
    let status: String = row.get(7)?;
    Ok(Report {
        id: row.get(0)?,
        reporter_id: row.get(1)?,
        reported_user_id: row.get(2)?,
        post_id: row.get(3)?,
        dua_request_id: row.get(4)?,
        reason: row.get(5)?,
        description: row.get(6)?,
        status: status.parse().map_err(|e| conversion_err(7, e))?,
        admin_notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn ban_at(row: &Row) -> rusqlite::Result<UserBan> {
    let ban_type: String = row.get(4)?;
    Ok(UserBan {
        id: row.get(0)?,
        user_id: row.get(1)?,
        banned_by: row.get(2)?,
        reason: row.get(3)?,
        ban_type: ban_type.parse().map_err(|e| conversion_err(4, e))?,
        expires_at: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// -- Users --

fn fetch_user(conn: &Connection, sql: &str, param: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt.query_row([param], |row| user_at(row, 0)).optional()?;
    Ok(row)
}

pub fn user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    fetch_user(
        conn,
        &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
        id,
    )
}

pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    fetch_user(
        conn,
        &format!("SELECT {USER_COLS} FROM users WHERE username = ?1"),
        username,
    )
}

pub fn user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    fetch_user(
        conn,
        &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
        email,
    )
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, name, username, avatar_url, bio, location, website, \
         verified, role, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            user.id,
            user.email,
            user.name,
            user.username,
            user.avatar_url,
            user.bio,
            user.location,
            user.website,
            user.verified,
            user.role.as_str(),
            user.created_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

/// Partial update: unset patch fields keep their current value.
pub fn update_user(
    conn: &Connection,
    id: &str,
    patch: &UserPatch,
    now: DateTime<Utc>,
) -> Result<Option<User>> {
    let changed = conn.execute(
        "UPDATE users SET \
         name = COALESCE(?2, name), \
         username = COALESCE(?3, username), \
         avatar_url = COALESCE(?4, avatar_url), \
         bio = COALESCE(?5, bio), \
         location = COALESCE(?6, location), \
         website = COALESCE(?7, website), \
         updated_at = ?8 \
         WHERE id = ?1",
        rusqlite::params![
            id,
            patch.name,
            patch.username,
            patch.avatar_url,
            patch.bio,
            patch.location,
            patch.website,
            now,
        ],
    )?;

    if changed == 0 {
        return Ok(None);
    }
    user_by_id(conn, id)
}

/// Batch-fetch users for a set of ids (moderation-queue enrichment).
pub fn users_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<User>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT {USER_COLS} FROM users WHERE id IN ({})",
        in_placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

    let rows = stmt
        .query_map(params.as_slice(), |row| user_at(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Posts --

pub fn posts_with_authors(conn: &Connection, limit: u32) -> Result<Vec<PostWithAuthor>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM posts p LEFT JOIN users u ON p.user_id = u.id \
         ORDER BY p.created_at DESC LIMIT ?1",
        prefixed(POST_COLS, "p"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(PostWithAuthor {
                post: post_at(row, 0)?,
                author: opt_user_at(row, 11)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn post_by_id(conn: &Connection, id: &str) -> Result<Option<PostWithAuthor>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM posts p LEFT JOIN users u ON p.user_id = u.id \
         WHERE p.id = ?1 LIMIT 1",
        prefixed(POST_COLS, "p"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([id], |row| {
            Ok(PostWithAuthor {
                post: post_at(row, 0)?,
                author: opt_user_at(row, 11)?,
            })
        })
        .optional()?;
    Ok(row)
}

pub fn insert_post(conn: &Connection, post: &Post) -> Result<()> {
    conn.execute(
        "INSERT INTO posts (id, user_id, content, media_url, category, tags, likes_count, \
         comments_count, shares_count, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            post.id,
            post.user_id,
            post.content,
            post.media_url,
            post.category,
            serde_json::to_string(&post.tags)?,
            post.likes_count,
            post.comments_count,
            post.shares_count,
            post.created_at,
            post.updated_at,
        ],
    )?;
    Ok(())
}

pub fn delete_post(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

pub fn posts_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Post>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT {POST_COLS} FROM posts WHERE id IN ({})",
        in_placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

    let rows = stmt
        .query_map(params.as_slice(), |row| post_at(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Dua requests --

pub fn dua_requests_with_authors(conn: &Connection, limit: u32) -> Result<Vec<DuaRequestWithAuthor>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM dua_requests d LEFT JOIN users u ON d.user_id = u.id \
         ORDER BY d.created_at DESC LIMIT ?1",
        prefixed(DUA_COLS, "d"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(DuaRequestWithAuthor {
                dua_request: dua_at(row, 0)?,
                author: opt_user_at(row, 9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn dua_request_by_id(conn: &Connection, id: &str) -> Result<Option<DuaRequestWithAuthor>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM dua_requests d LEFT JOIN users u ON d.user_id = u.id \
         WHERE d.id = ?1 LIMIT 1",
        prefixed(DUA_COLS, "d"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([id], |row| {
            Ok(DuaRequestWithAuthor {
                dua_request: dua_at(row, 0)?,
                author: opt_user_at(row, 9)?,
            })
        })
        .optional()?;
    Ok(row)
}

pub fn insert_dua_request(conn: &Connection, dua: &DuaRequest) -> Result<()> {
    conn.execute(
        "INSERT INTO dua_requests (id, user_id, content, category, is_anonymous, prayers_count, \
         comments_count, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            dua.id,
            dua.user_id,
            dua.content,
            dua.category,
            dua.is_anonymous,
            dua.prayers_count,
            dua.comments_count,
            dua.created_at,
            dua.updated_at,
        ],
    )?;
    Ok(())
}

pub fn dua_requests_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<DuaRequest>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT {DUA_COLS} FROM dua_requests WHERE id IN ({})",
        in_placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

    let rows = stmt
        .query_map(params.as_slice(), |row| dua_at(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Comments --

const COMMENT_COLS: &str =
    "id, user_id, post_id, dua_request_id, content, created_at, updated_at";

fn comments_where(conn: &Connection, filter_col: &str, id: &str) -> Result<Vec<CommentWithAuthor>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM comments c LEFT JOIN users u ON c.user_id = u.id \
         WHERE c.{filter_col} = ?1 \
         ORDER BY c.created_at DESC",
        prefixed(COMMENT_COLS, "c"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([id], |row| {
            Ok(CommentWithAuthor {
                comment: comment_at(row, 0)?,
                author: opt_user_at(row, 7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn comments_by_post(conn: &Connection, post_id: &str) -> Result<Vec<CommentWithAuthor>> {
    comments_where(conn, "post_id", post_id)
}

pub fn comments_by_dua_request(
    conn: &Connection,
    dua_request_id: &str,
) -> Result<Vec<CommentWithAuthor>> {
    comments_where(conn, "dua_request_id", dua_request_id)
}

pub fn insert_comment(conn: &Connection, comment: &Comment) -> Result<()> {
    conn.execute(
        "INSERT INTO comments (id, user_id, post_id, dua_request_id, content, created_at, \
         updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            comment.id,
            comment.user_id,
            comment.post_id,
            comment.dua_request_id,
            comment.content,
            comment.created_at,
            comment.updated_at,
        ],
    )?;
    Ok(())
}

// -- Likes and bookmarks --
// Structurally identical join tables; one set of helpers parameterized by
// table name serves both.

struct MarkRow {
    id: String,
    user_id: String,
    post_id: Option<String>,
    dua_request_id: Option<String>,
    created_at: DateTime<Utc>,
}

/// Scoped lookup: the user filter is always applied, the target filters only
/// when given (mirrors how callers pass exactly one target id).
fn find_mark(
    conn: &Connection,
    table: &str,
    user_id: &str,
    post_id: Option<&str>,
    dua_request_id: Option<&str>,
) -> Result<Option<MarkRow>> {
    let mut sql = format!(
        "SELECT id, user_id, post_id, dua_request_id, created_at FROM {table} WHERE user_id = ?"
    );
    let mut params: Vec<&dyn ToSql> = vec![&user_id];
    if let Some(ref pid) = post_id {
        sql.push_str(" AND post_id = ?");
        params.push(pid);
    }
    if let Some(ref did) = dua_request_id {
        sql.push_str(" AND dua_request_id = ?");
        params.push(did);
    }
    sql.push_str(" LIMIT 1");

    let mut stmt = conn.prepare(&sql)?;
    let row = stmt
        .query_row(params.as_slice(), |row| {
            Ok(MarkRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                post_id: row.get(2)?,
                dua_request_id: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn insert_mark(conn: &Connection, table: &str, mark: &MarkRow) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {table} (id, user_id, post_id, dua_request_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)"
        ),
        rusqlite::params![
            mark.id,
            mark.user_id,
            mark.post_id,
            mark.dua_request_id,
            mark.created_at,
        ],
    )?;
    Ok(())
}

fn delete_mark(conn: &Connection, table: &str, id: &str) -> Result<()> {
    conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
    Ok(())
}

pub fn find_like(
    conn: &Connection,
    user_id: &str,
    post_id: Option<&str>,
    dua_request_id: Option<&str>,
) -> Result<Option<Like>> {
    Ok(find_mark(conn, "likes", user_id, post_id, dua_request_id)?.map(|m| Like {
        id: m.id,
        user_id: m.user_id,
        post_id: m.post_id,
        dua_request_id: m.dua_request_id,
        created_at: m.created_at,
    }))
}

pub fn find_bookmark(
    conn: &Connection,
    user_id: &str,
    post_id: Option<&str>,
    dua_request_id: Option<&str>,
) -> Result<Option<Bookmark>> {
    Ok(
        find_mark(conn, "bookmarks", user_id, post_id, dua_request_id)?.map(|m| Bookmark {
            id: m.id,
            user_id: m.user_id,
            post_id: m.post_id,
            dua_request_id: m.dua_request_id,
            created_at: m.created_at,
        }),
    )
}

/// Toggle: remove the existing row if present, insert otherwise.
/// Returns true when a row was added. Not atomic against concurrent
/// togglers — the UNIQUE(user_id, post_id, dua_request_id) constraint is the
/// real guard.
pub fn toggle_mark(
    conn: &Connection,
    table: &str,
    id: String,
    user_id: &str,
    post_id: Option<&str>,
    dua_request_id: Option<&str>,
) -> Result<bool> {
    match find_mark(conn, table, user_id, post_id, dua_request_id)? {
        Some(existing) => {
            delete_mark(conn, table, &existing.id)?;
            Ok(false)
        }
        None => {
            insert_mark(
                conn,
                table,
                &MarkRow {
                    id,
                    user_id: user_id.to_string(),
                    post_id: post_id.map(str::to_string),
                    dua_request_id: dua_request_id.map(str::to_string),
                    created_at: Utc::now(),
                },
            )?;
            Ok(true)
        }
    }
}

// -- Communities --

const COMMUNITY_COLS: &str =
    "id, name, description, category, created_by, member_count, created_at, updated_at";

fn community_at(row: &Row, base: usize) -> rusqlite::Result<Community> {
    Ok(Community {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        description: row.get(base + 2)?,
        category: row.get(base + 3)?,
        created_by: row.get(base + 4)?,
        member_count: row.get(base + 5)?,
        created_at: row.get(base + 6)?,
        updated_at: row.get(base + 7)?,
    })
}

pub fn communities_with_owners(conn: &Connection, limit: u32) -> Result<Vec<CommunityWithOwner>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM communities c LEFT JOIN users u ON c.created_by = u.id \
         ORDER BY c.created_at DESC LIMIT ?1",
        prefixed(COMMUNITY_COLS, "c"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(CommunityWithOwner {
                community: community_at(row, 0)?,
                owner: opt_user_at(row, 8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_community(conn: &Connection, community: &Community) -> Result<()> {
    conn.execute(
        "INSERT INTO communities (id, name, description, category, created_by, member_count, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            community.id,
            community.name,
            community.description,
            community.category,
            community.created_by,
            community.member_count,
            community.created_at,
            community.updated_at,
        ],
    )?;
    Ok(())
}

pub fn insert_community_member(conn: &Connection, member: &CommunityMember) -> Result<()> {
    conn.execute(
        "INSERT INTO community_members (id, community_id, user_id, role, joined_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            member.id,
            member.community_id,
            member.user_id,
            member.role,
            member.joined_at,
        ],
    )?;
    Ok(())
}

// -- Events --

const EVENT_COLS: &str =
    "id, title, description, location_name, starts_at, created_by, attendees_count, \
     created_at, updated_at";

fn event_at(row: &Row, base: usize) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(base)?,
        title: row.get(base + 1)?,
        description: row.get(base + 2)?,
        location_name: row.get(base + 3)?,
        starts_at: row.get(base + 4)?,
        created_by: row.get(base + 5)?,
        attendees_count: row.get(base + 6)?,
        created_at: row.get(base + 7)?,
        updated_at: row.get(base + 8)?,
    })
}

pub fn events_with_owners(conn: &Connection, limit: u32) -> Result<Vec<EventWithOwner>> {
    let sql = format!(
        "SELECT {}, {} \
         FROM events e LEFT JOIN users u ON e.created_by = u.id \
         ORDER BY e.created_at DESC LIMIT ?1",
        prefixed(EVENT_COLS, "e"),
        prefixed(USER_COLS, "u"),
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(EventWithOwner {
                event: event_at(row, 0)?,
                owner: opt_user_at(row, 9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    conn.execute(
        "INSERT INTO events (id, title, description, location_name, starts_at, created_by, \
         attendees_count, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            event.id,
            event.title,
            event.description,
            event.location_name,
            event.starts_at,
            event.created_by,
            event.attendees_count,
            event.created_at,
            event.updated_at,
        ],
    )?;
    Ok(())
}

pub fn insert_event_attendee(conn: &Connection, attendee: &EventAttendee) -> Result<()> {
    conn.execute(
        "INSERT INTO event_attendees (id, event_id, user_id, registered_at) \
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            attendee.id,
            attendee.event_id,
            attendee.user_id,
            attendee.registered_at,
        ],
    )?;
    Ok(())
}

// -- Reports --

const REPORT_COLS: &str =
    "id, reporter_id, reported_user_id, post_id, dua_request_id, reason, description, status, \
     admin_notes, created_at, updated_at";

pub fn insert_report(conn: &Connection, report: &Report) -> Result<()> {
    conn.execute(
        "INSERT INTO reports (id, reporter_id, reported_user_id, post_id, dua_request_id, \
         reason, description, status, admin_notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            report.id,
            report.reporter_id,
            report.reported_user_id,
            report.post_id,
            report.dua_request_id,
            report.reason,
            report.description,
            report.status.as_str(),
            report.admin_notes,
            report.created_at,
            report.updated_at,
        ],
    )?;
    Ok(())
}

pub fn reports(conn: &Connection, limit: u32) -> Result<Vec<Report>> {
    let sql = format!("SELECT {REPORT_COLS} FROM reports ORDER BY created_at DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([limit], report_at)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn report_by_id(conn: &Connection, id: &str) -> Result<Option<Report>> {
    let sql = format!("SELECT {REPORT_COLS} FROM reports WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt.query_row([id], report_at).optional()?;
    Ok(row)
}

pub fn update_report_status(
    conn: &Connection,
    id: &str,
    status: ReportStatus,
    admin_notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<Report>> {
    let changed = conn.execute(
        "UPDATE reports SET status = ?2, admin_notes = ?3, updated_at = ?4 WHERE id = ?1",
        rusqlite::params![id, status.as_str(), admin_notes, now],
    )?;

    if changed == 0 {
        return Ok(None);
    }
    report_by_id(conn, id)
}

// -- Bans --

const BAN_COLS: &str =
    "id, user_id, banned_by, reason, ban_type, expires_at, is_active, created_at";

pub fn insert_ban(conn: &Connection, ban: &UserBan) -> Result<()> {
    conn.execute(
        "INSERT INTO user_bans (id, user_id, banned_by, reason, ban_type, expires_at, \
         is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            ban.id,
            ban.user_id,
            ban.banned_by,
            ban.reason,
            ban.ban_type.as_str(),
            ban.expires_at,
            ban.is_active,
            ban.created_at,
        ],
    )?;
    Ok(())
}

pub fn active_bans(conn: &Connection, user_id: &str) -> Result<Vec<UserBan>> {
    let sql = format!("SELECT {BAN_COLS} FROM user_bans WHERE user_id = ?1 AND is_active = 1");
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([user_id], ban_at)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Health --

/// Trivial bounded select; an empty users table is still healthy.
pub fn ping(conn: &Connection) -> Result<()> {
    let _: Option<String> = conn
        .query_row("SELECT id FROM users LIMIT 1", [], |row| row.get(0))
        .optional()?;
    Ok(())
}

// -- SQL helpers --

fn in_placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"a, b" -> "t.a, t.b"` for the joined feed selects.
fn prefixed(cols: &str, table: &str) -> String {
    cols.split(',')
        .map(|c| format!("{}.{}", table, c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
