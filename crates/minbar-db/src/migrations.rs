use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            name        TEXT NOT NULL,
            username    TEXT NOT NULL UNIQUE,
            avatar_url  TEXT,
            bio         TEXT,
            location    TEXT,
            website     TEXT,
            verified    INTEGER NOT NULL DEFAULT 0,
            role        TEXT NOT NULL DEFAULT 'user',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            content         TEXT NOT NULL,
            media_url       TEXT,
            category        TEXT,
            tags            TEXT NOT NULL DEFAULT '[]',
            likes_count     INTEGER NOT NULL DEFAULT 0,
            comments_count  INTEGER NOT NULL DEFAULT 0,
            shares_count    INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(created_at);

        CREATE TABLE IF NOT EXISTS dua_requests (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            content         TEXT NOT NULL,
            category        TEXT,
            is_anonymous    INTEGER NOT NULL DEFAULT 0,
            prayers_count   INTEGER NOT NULL DEFAULT 0,
            comments_count  INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_dua_requests_created
            ON dua_requests(created_at);

        -- Comments, likes, bookmarks and reports target exactly one of
        -- {post, dua request}; the CHECK enforces the exactly-one rule.
        CREATE TABLE IF NOT EXISTS comments (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            post_id         TEXT REFERENCES posts(id),
            dua_request_id  TEXT REFERENCES dua_requests(id),
            content         TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            CHECK ((post_id IS NULL) <> (dua_request_id IS NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments(post_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_comments_dua
            ON comments(dua_request_id, created_at);

        -- The UNIQUE constraint is the real toggle guard; the facade's
        -- presence check before insert/delete is only an optimization.
        CREATE TABLE IF NOT EXISTS likes (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            post_id         TEXT REFERENCES posts(id),
            dua_request_id  TEXT REFERENCES dua_requests(id),
            created_at      TEXT NOT NULL,
            CHECK ((post_id IS NULL) <> (dua_request_id IS NULL)),
            UNIQUE(user_id, post_id, dua_request_id)
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            post_id         TEXT REFERENCES posts(id),
            dua_request_id  TEXT REFERENCES dua_requests(id),
            created_at      TEXT NOT NULL,
            CHECK ((post_id IS NULL) <> (dua_request_id IS NULL)),
            UNIQUE(user_id, post_id, dua_request_id)
        );

        CREATE TABLE IF NOT EXISTS communities (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL UNIQUE,
            description   TEXT,
            category      TEXT,
            created_by    TEXT NOT NULL REFERENCES users(id),
            member_count  INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS community_members (
            id            TEXT PRIMARY KEY,
            community_id  TEXT NOT NULL REFERENCES communities(id),
            user_id       TEXT NOT NULL REFERENCES users(id),
            role          TEXT NOT NULL DEFAULT 'member',
            joined_at     TEXT NOT NULL,
            UNIQUE(community_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS events (
            id               TEXT PRIMARY KEY,
            title            TEXT NOT NULL,
            description      TEXT,
            location_name    TEXT,
            starts_at        TEXT NOT NULL,
            created_by       TEXT NOT NULL REFERENCES users(id),
            attendees_count  INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS event_attendees (
            id             TEXT PRIMARY KEY,
            event_id       TEXT NOT NULL REFERENCES events(id),
            user_id        TEXT NOT NULL REFERENCES users(id),
            registered_at  TEXT NOT NULL,
            UNIQUE(event_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS reports (
            id                TEXT PRIMARY KEY,
            reporter_id       TEXT NOT NULL REFERENCES users(id),
            reported_user_id  TEXT NOT NULL REFERENCES users(id),
            post_id           TEXT REFERENCES posts(id),
            dua_request_id    TEXT REFERENCES dua_requests(id),
            reason            TEXT NOT NULL,
            description       TEXT,
            status            TEXT NOT NULL DEFAULT 'pending',
            admin_notes       TEXT,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL,
            CHECK (post_id IS NULL OR dua_request_id IS NULL)
        );

        CREATE INDEX IF NOT EXISTS idx_reports_created
            ON reports(created_at);

        CREATE TABLE IF NOT EXISTS user_bans (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            banned_by   TEXT REFERENCES users(id),
            reason      TEXT NOT NULL,
            ban_type    TEXT NOT NULL,
            expires_at  TEXT,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_user_bans_user
            ON user_bans(user_id, is_active);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
