//! SQLite record store.
//!
//! Wraps a single `rusqlite::Connection`. The donation transaction and
//! the badge union run under IMMEDIATE transactions, which is the store's
//! native answer to concurrent submissions from the same user: the second
//! writer blocks (or fails busy, surfaced as a transient error) instead
//! of double-awarding.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::community::{Comment, Post, PostView};
use crate::donation::DonationPolicy;
use crate::error::{CoreError, StoreError};
use crate::event::{DayPhase, HealthLogEvent, Reading};
use crate::store::{data_dir, migrations, RecordStore, SubmitOutcome, UserSummary};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed record store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the store at `~/.config/healthykong/healthykong.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        Self::open_at(&data_dir()?.join("healthykong.db"))
    }

    /// Open the store at an explicit database file path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &std::path::Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        migrations::migrate(&conn)
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, i64, Option<String>, String)> {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, String>(3)?,
        ))
    }

    fn decode_summary(
        user_id: String,
        total: i64,
        last_date: Option<String>,
        badges_json: String,
    ) -> Result<UserSummary, StoreError> {
        let last_record_date = last_date
            .map(|s| {
                NaiveDate::parse_from_str(&s, DAY_KEY_FORMAT)
                    .map_err(|e| StoreError::Corrupt(format!("last_record_date '{s}': {e}")))
            })
            .transpose()?;
        let badges: BTreeSet<String> = serde_json::from_str(&badges_json)
            .map_err(|e| StoreError::Corrupt(format!("badge set: {e}")))?;
        Ok(UserSummary {
            user_id,
            total_donation: total,
            last_record_date,
            badges,
        })
    }

    fn decode_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, Option<String>, String)> {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, String>(4)?,
        ))
    }

    fn event_from_columns(
        id: String,
        user_id: String,
        reading_json: String,
        phase: Option<String>,
        recorded_at: String,
    ) -> Result<HealthLogEvent, StoreError> {
        let id = Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt(format!("event id: {e}")))?;
        let reading: Reading = serde_json::from_str(&reading_json)
            .map_err(|e| StoreError::Corrupt(format!("reading: {e}")))?;
        let phase = phase
            .map(|p| {
                DayPhase::parse(&p).ok_or_else(|| StoreError::Corrupt(format!("day phase '{p}'")))
            })
            .transpose()?;
        let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
            .map_err(|e| StoreError::Corrupt(format!("recorded_at: {e}")))?
            .with_timezone(&Utc);
        Ok(HealthLogEvent {
            id,
            user_id,
            reading,
            phase,
            recorded_at,
        })
    }

    /// Points already awarded within `today`'s calendar month.
    ///
    /// Distinct day keys double as awarded days until the cap is hit, so
    /// the awarded amount is the distinct-day count times the unit,
    /// clamped to the cap.
    fn month_awarded(
        conn: &Connection,
        user_id: &str,
        today: NaiveDate,
        policy: &DonationPolicy,
    ) -> Result<i64, StoreError> {
        let Some(cap) = policy.monthly_cap else {
            return Ok(0);
        };
        let month_prefix = today.format("%Y-%m-").to_string();
        let distinct_days: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT day_key) FROM health_logs
             WHERE user_id = ?1 AND day_key LIKE ?2 || '%'",
            params![user_id, month_prefix],
            |row| row.get(0),
        )?;
        Ok((distinct_days * policy.unit).min(cap))
    }
}

impl RecordStore for SqliteStore {
    fn create_user(&mut self, user_id: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO users (id, total_donation, last_record_date, badges, created_at)
             VALUES (?1, 0, NULL, '[]', ?2)",
            params![user_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn user_summary(&self, user_id: &str) -> Result<UserSummary, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, total_donation, last_record_date, badges FROM users WHERE id = ?1",
                params![user_id],
                Self::summary_from_row,
            );
        match row {
            Ok((id, total, last, badges)) => Self::decode_summary(id, total, last, badges),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StoreError::NotFound(user_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn submit_log(
        &mut self,
        event: &HealthLogEvent,
        today: NaiveDate,
        policy: &DonationPolicy,
    ) -> Result<SubmitOutcome, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let row = tx.query_row(
            "SELECT id, total_donation, last_record_date, badges FROM users WHERE id = ?1",
            params![event.user_id],
            Self::summary_from_row,
        );
        let (id, total, last, badges) = match row {
            Ok(r) => r,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::NotFound(event.user_id.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        let summary = Self::decode_summary(id, total, last, badges)?;

        let month_awarded = Self::month_awarded(&tx, &event.user_id, today, policy)?;
        let decision = policy.assess(
            summary.total_donation,
            summary.last_record_date,
            today,
            month_awarded,
        );

        let reading_json = serde_json::to_string(&event.reading)
            .map_err(|e| StoreError::Corrupt(format!("reading encode: {e}")))?;
        tx.execute(
            "INSERT INTO health_logs (id, user_id, kind, reading, phase, recorded_at, day_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.id.to_string(),
                event.user_id,
                event.reading.kind().as_str(),
                reading_json,
                event.phase.map(|p| p.as_str()),
                event.recorded_at.to_rfc3339(),
                today.format(DAY_KEY_FORMAT).to_string(),
            ],
        )?;

        if decision.first_of_day {
            tx.execute(
                "UPDATE users SET total_donation = ?1, last_record_date = ?2 WHERE id = ?3",
                params![
                    decision.new_total,
                    decision
                        .new_last_date
                        .map(|d| d.format(DAY_KEY_FORMAT).to_string()),
                    event.user_id,
                ],
            )?;
        }

        tx.commit()?;

        Ok(SubmitOutcome {
            first_donation_of_day: decision.first_of_day && !decision.capped,
            capped: decision.capped,
            new_total: decision.new_total,
        })
    }

    fn logs_for_user(&self, user_id: &str) -> Result<Vec<HealthLogEvent>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, reading, phase, recorded_at FROM health_logs
             WHERE user_id = ?1 ORDER BY recorded_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], Self::decode_event)?;

        let mut events = Vec::new();
        for row in rows {
            let (id, user_id, reading, phase, recorded_at) = row?;
            events.push(Self::event_from_columns(
                id, user_id, reading, phase, recorded_at,
            )?);
        }
        Ok(events)
    }

    fn merge_badges(
        &mut self,
        user_id: &str,
        qualified: &[&str],
    ) -> Result<Vec<String>, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let badges_json = match tx.query_row(
            "SELECT badges FROM users WHERE id = ?1",
            params![user_id],
            |row| row.get::<_, String>(0),
        ) {
            Ok(json) => json,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::NotFound(user_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut owned: BTreeSet<String> = serde_json::from_str(&badges_json)
            .map_err(|e| StoreError::Corrupt(format!("badge set: {e}")))?;

        let new_ids: Vec<String> = qualified
            .iter()
            .filter(|id| !owned.contains(**id))
            .map(|id| id.to_string())
            .collect();

        if !new_ids.is_empty() {
            owned.extend(new_ids.iter().cloned());
            let merged = serde_json::to_string(&owned)
                .map_err(|e| StoreError::Corrupt(format!("badge set encode: {e}")))?;
            tx.execute(
                "UPDATE users SET badges = ?1 WHERE id = ?2",
                params![merged, user_id],
            )?;
        }

        tx.commit()?;
        Ok(new_ids)
    }
}

// Community feed CRUD. Out of the engine's scope, so these live directly
// on the store rather than behind the RecordStore trait.
impl SqliteStore {
    /// Create a post, snapshotting the author's current donor level.
    pub fn create_post(
        &mut self,
        author_id: &str,
        author_level: u8,
        title: &str,
        content: &str,
    ) -> Result<Post, StoreError> {
        let post = Post {
            id: Uuid::new_v4(),
            author_id: author_id.to_string(),
            author_level,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO posts (id, author_id, author_level, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                post.id.to_string(),
                post.author_id,
                post.author_level,
                post.title,
                post.content,
                post.created_at.to_rfc3339(),
            ],
        )?;
        Ok(post)
    }

    /// The feed: posts newest first, with like and comment counts.
    pub fn list_posts(&self) -> Result<Vec<PostView>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.author_id, p.author_level, p.title, p.content, p.created_at,
                    (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id),
                    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id)
             FROM posts p ORDER BY p.created_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, u64>(6)?,
                row.get::<_, u64>(7)?,
            ))
        })?;

        let mut views = Vec::new();
        for row in rows {
            let (id, author_id, author_level, title, content, created_at, likes, comments) = row?;
            views.push(PostView {
                post: Post {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| StoreError::Corrupt(format!("post id: {e}")))?,
                    author_id,
                    author_level,
                    title,
                    content,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .map_err(|e| StoreError::Corrupt(format!("post created_at: {e}")))?
                        .with_timezone(&Utc),
                },
                like_count: likes,
                comment_count: comments,
            });
        }
        Ok(views)
    }

    /// Add a comment to a post. `NotFound` if the post does not exist.
    pub fn add_comment(
        &mut self,
        post_id: Uuid,
        author_id: &str,
        author_level: u8,
        content: &str,
    ) -> Result<Comment, StoreError> {
        let exists: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE id = ?1",
            params![post_id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(StoreError::NotFound(post_id.to_string()));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id: author_id.to_string(),
            author_level,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO comments (id, post_id, author_id, author_level, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.id.to_string(),
                comment.post_id.to_string(),
                comment.author_id,
                comment.author_level,
                comment.content,
                comment.created_at.to_rfc3339(),
            ],
        )?;
        Ok(comment)
    }

    /// Comments for a post, oldest first.
    pub fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, author_id, author_level, content, created_at FROM comments
             WHERE post_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(params![post_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut comments = Vec::new();
        for row in rows {
            let (id, author_id, author_level, content, created_at) = row?;
            comments.push(Comment {
                id: Uuid::parse_str(&id)
                    .map_err(|e| StoreError::Corrupt(format!("comment id: {e}")))?,
                post_id,
                author_id,
                author_level,
                content,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| StoreError::Corrupt(format!("comment created_at: {e}")))?
                    .with_timezone(&Utc),
            });
        }
        Ok(comments)
    }

    /// Toggle a like. Returns whether the user likes the post afterwards.
    pub fn toggle_like(&mut self, post_id: Uuid, user_id: &str) -> Result<bool, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let removed = tx.execute(
            "DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
            params![post_id.to_string(), user_id],
        )?;
        let liked_now = if removed == 0 {
            tx.execute(
                "INSERT INTO post_likes (post_id, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![post_id.to_string(), user_id, Utc::now().to_rfc3339()],
            )?;
            true
        } else {
            false
        };

        tx.commit()?;
        Ok(liked_now)
    }

    /// Distinct likers of a post.
    pub fn like_count(&self, post_id: Uuid) -> Result<u64, StoreError> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM post_likes WHERE post_id = ?1",
            params![post_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
