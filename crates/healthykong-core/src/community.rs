//! Community feed types.
//!
//! Posts and comments are plain CRUD; the store methods live on
//! [`crate::store::SqliteStore`]. The one rule worth stating: a like is
//! idempotent per (post, user) -- a second like from the same user undoes
//! the first. Each post and comment also snapshots the author's donor
//! level at authoring time, so old posts keep showing the level the
//! author had when they wrote them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Longest accepted post title.
pub const MAX_TITLE_LEN: usize = 120;
/// Longest accepted post or comment body.
pub const MAX_CONTENT_LEN: usize = 4000;

/// A community post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: String,
    /// Author's donor-level rank when the post was written.
    pub author_level: u8,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: String,
    /// Author's donor-level rank when the comment was written.
    pub author_level: u8,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post with its engagement counters, as shown in the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub like_count: u64,
    pub comment_count: u64,
}

/// Reject empty or oversized free text before it reaches the store.
pub fn validate_text(field: &str, text: &str, max_len: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::InvalidText {
            field: field.into(),
            message: "must not be empty".into(),
        });
    }
    if text.chars().count() > max_len {
        return Err(ValidationError::InvalidText {
            field: field.into(),
            message: format!("must be at most {max_len} characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_rejected() {
        assert!(validate_text("title", "   ", MAX_TITLE_LEN).is_err());
    }

    #[test]
    fn oversized_content_rejected() {
        let long = "a".repeat(MAX_CONTENT_LEN + 1);
        assert!(validate_text("content", &long, MAX_CONTENT_LEN).is_err());
        let ok = "a".repeat(MAX_CONTENT_LEN);
        assert!(validate_text("content", &ok, MAX_CONTENT_LEN).is_ok());
    }

    #[test]
    fn post_view_flattens_post_fields() {
        let view = PostView {
            post: Post {
                id: Uuid::new_v4(),
                author_id: "u1".into(),
                author_level: 2,
                title: "Hello".into(),
                content: "World".into(),
                created_at: Utc::now(),
            },
            like_count: 3,
            comment_count: 1,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["like_count"], 3);
    }
}
