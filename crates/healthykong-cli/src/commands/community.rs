use clap::Subcommand;
use healthykong_core::community::{validate_text, MAX_CONTENT_LEN, MAX_TITLE_LEN};
use healthykong_core::lookup_donor_level;
use uuid::Uuid;

use super::common::open_engine;

#[derive(Subcommand)]
pub enum CommunityAction {
    /// Write a post
    Post {
        /// Author user ID
        user: String,
        /// Post title
        title: String,
        /// Post body
        content: String,
    },
    /// Show the feed, newest first
    List,
    /// Comment on a post
    Comment {
        /// Author user ID
        user: String,
        /// Post ID
        post_id: Uuid,
        /// Comment body
        content: String,
    },
    /// Show a post's comments
    Comments {
        /// Post ID
        post_id: Uuid,
    },
    /// Toggle a like on a post
    Like {
        /// User ID
        user: String,
        /// Post ID
        post_id: Uuid,
    },
}

pub fn run(action: CommunityAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;

    match action {
        CommunityAction::Post {
            user,
            title,
            content,
        } => {
            validate_text("title", &title, MAX_TITLE_LEN)?;
            validate_text("content", &content, MAX_CONTENT_LEN)?;
            let level = lookup_donor_level(engine.user_summary(&user)?.total_donation);
            let post = engine
                .store_mut()
                .create_post(&user, level.rank, &title, &content)?;
            println!("Posted: {}", post.id);
        }
        CommunityAction::List => {
            let feed = engine.store().list_posts()?;
            println!("{}", serde_json::to_string_pretty(&feed)?);
        }
        CommunityAction::Comment {
            user,
            post_id,
            content,
        } => {
            validate_text("content", &content, MAX_CONTENT_LEN)?;
            let level = lookup_donor_level(engine.user_summary(&user)?.total_donation);
            let comment = engine
                .store_mut()
                .add_comment(post_id, &user, level.rank, &content)?;
            println!("Commented: {}", comment.id);
        }
        CommunityAction::Comments { post_id } => {
            let comments = engine.store().comments_for_post(post_id)?;
            println!("{}", serde_json::to_string_pretty(&comments)?);
        }
        CommunityAction::Like { user, post_id } => {
            let liked = engine.store_mut().toggle_like(post_id, &user)?;
            let count = engine.store().like_count(post_id)?;
            if liked {
                println!("Liked ({count} total)");
            } else {
                println!("Unliked ({count} total)");
            }
        }
    }
    Ok(())
}
