//! Database schema migrations for healthykong.
//!
//! Migrations are versioned and applied automatically when opening the
//! store. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current
/// schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            0
        } else {
            eprintln!("Warning: failed to read schema_version: {}", e);
            0
        }
    })
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: user summaries and the append-only health log.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id               TEXT PRIMARY KEY,
            total_donation   INTEGER NOT NULL DEFAULT 0,
            last_record_date TEXT,
            badges           TEXT NOT NULL DEFAULT '[]',
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS health_logs (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            kind        TEXT NOT NULL,
            reading     TEXT NOT NULL,
            phase       TEXT,
            recorded_at TEXT NOT NULL,
            day_key     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_health_logs_user_recorded
            ON health_logs(user_id, recorded_at DESC);
        CREATE INDEX IF NOT EXISTS idx_health_logs_user_day
            ON health_logs(user_id, day_key);",
    )?;
    set_schema_version(conn, 1)
}

/// v2: community feed (posts, comments, likes).
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS posts (
            id           TEXT PRIMARY KEY,
            author_id    TEXT NOT NULL,
            author_level INTEGER NOT NULL,
            title        TEXT NOT NULL,
            content      TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS comments (
            id           TEXT PRIMARY KEY,
            post_id      TEXT NOT NULL REFERENCES posts(id),
            author_id    TEXT NOT NULL,
            author_level INTEGER NOT NULL,
            content      TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );

        -- The composite primary key is what makes like toggling
        -- idempotent per (post, user).
        CREATE TABLE IF NOT EXISTS post_likes (
            post_id    TEXT NOT NULL,
            user_id    TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (post_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, created_at);",
    )?;
    set_schema_version(conn, 2)
}
