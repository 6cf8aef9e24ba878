use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A user as shown in follower/following lists.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FollowUserEntry {
    pub id: i64,
    pub username: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub followed_at: DateTime<Utc>,
}

/// A user as shown in a workout's like list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LikeEntry {
    pub id: i64,
    pub username: String,
    pub liked_at: DateTime<Utc>,
}

/// Comment joined with its author's public profile fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
    pub bio: String,
}

/// Public workout annotated for feed/discover listings.
///
/// `is_liked` is actor-specific; it is always false for anonymous viewers.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FeedItem {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub duration: Option<i32>,
    pub notes: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
    pub bio: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
}
