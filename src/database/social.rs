use sqlx::PgPool;

use super::StoreError;
use crate::models::{CommentWithAuthor, FeedItem, FollowUserEntry, LikeEntry};

/// Social graph persistence: follows, likes, comments, feed assembly.
pub struct SocialStore {
    pool: PgPool,
}

impl SocialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== Follows ====================

    /// Record a follow. Returns false when the pair already exists; duplicate
    /// detection rides on the primary key instead of a check-then-insert.
    pub async fn follow(&self, follower_id: i64, following_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            ",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id)
                .bind(following_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn followers(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowUserEntry>, StoreError> {
        let followers = sqlx::query_as::<_, FollowUserEntry>(
            r"
            SELECT
                u.id,
                u.username,
                u.bio,
                u.created_at,
                f.created_at AS followed_at
            FROM follows f
            JOIN users u ON f.follower_id = u.id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(followers)
    }

    pub async fn following(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowUserEntry>, StoreError> {
        let following = sqlx::query_as::<_, FollowUserEntry>(
            r"
            SELECT
                u.id,
                u.username,
                u.bio,
                u.created_at,
                f.created_at AS followed_at
            FROM follows f
            JOIN users u ON f.following_id = u.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(following)
    }

    pub async fn is_following(
        &self,
        follower_id: i64,
        following_id: i64,
    ) -> Result<bool, StoreError> {
        let following: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(following)
    }

    // ==================== Likes ====================

    /// Record a like. Returns false when the actor already liked the workout.
    pub async fn like(&self, user_id: i64, workout_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            INSERT INTO likes (user_id, workout_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, workout_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(workout_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn unlike(&self, user_id: i64, workout_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND workout_id = $2")
            .bind(user_id)
            .bind(workout_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn likes(
        &self,
        workout_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LikeEntry>, StoreError> {
        let likes = sqlx::query_as::<_, LikeEntry>(
            r"
            SELECT
                u.id,
                u.username,
                l.created_at AS liked_at
            FROM likes l
            JOIN users u ON l.user_id = u.id
            WHERE l.workout_id = $1
            ORDER BY l.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(workout_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(likes)
    }

    pub async fn has_liked(&self, user_id: i64, workout_id: i64) -> Result<bool, StoreError> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE user_id = $1 AND workout_id = $2)",
        )
        .bind(user_id)
        .bind(workout_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(liked)
    }

    // ==================== Comments ====================

    /// Insert a comment and return it joined with the author's public fields.
    pub async fn add_comment(
        &self,
        user_id: i64,
        workout_id: i64,
        content: &str,
    ) -> Result<CommentWithAuthor, StoreError> {
        let comment = sqlx::query_as::<_, CommentWithAuthor>(
            r"
            WITH inserted AS (
                INSERT INTO comments (user_id, workout_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, content, created_at, user_id
            )
            SELECT
                i.id,
                i.content,
                i.created_at,
                u.id AS user_id,
                u.username,
                u.bio
            FROM inserted i
            JOIN users u ON i.user_id = u.id
            ",
        )
        .bind(user_id)
        .bind(workout_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    /// Comments in chronological reading order, oldest first.
    pub async fn comments(
        &self,
        workout_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r"
            SELECT
                c.id,
                c.content,
                c.created_at,
                u.id AS user_id,
                u.username,
                u.bio
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.workout_id = $1
            ORDER BY c.created_at ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(workout_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// Author-scoped delete; a comment owned by someone else deletes zero
    /// rows, indistinguishable from a missing comment.
    pub async fn delete_comment(&self, actor: i64, comment_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
            .bind(comment_id)
            .bind(actor)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== Feed ====================

    /// Public workouts from users the actor follows, annotated with like and
    /// comment counts plus the actor's own like state.
    pub async fn feed(
        &self,
        actor: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>, StoreError> {
        let items = sqlx::query_as::<_, FeedItem>(
            r"
            SELECT
                w.id,
                w.title,
                w.date,
                w.duration,
                w.notes,
                w.is_public,
                w.created_at,
                u.id AS user_id,
                u.username,
                u.bio,
                COUNT(DISTINCT l.id) AS like_count,
                COUNT(DISTINCT c.id) AS comment_count,
                (my_likes.id IS NOT NULL) AS is_liked
            FROM workouts w
            JOIN users u ON w.user_id = u.id
            JOIN follows f ON f.following_id = w.user_id
            LEFT JOIN likes l ON l.workout_id = w.id
            LEFT JOIN comments c ON c.workout_id = w.id
            LEFT JOIN likes my_likes ON my_likes.workout_id = w.id AND my_likes.user_id = $1
            WHERE f.follower_id = $1 AND w.is_public
            GROUP BY w.id, u.id, my_likes.id
            ORDER BY w.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(actor)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// All public workouts regardless of follow relationship. `is_liked` is
    /// computed when an actor is known; a NULL actor never matches a like row.
    pub async fn discover(
        &self,
        actor: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>, StoreError> {
        let items = sqlx::query_as::<_, FeedItem>(
            r"
            SELECT
                w.id,
                w.title,
                w.date,
                w.duration,
                w.notes,
                w.is_public,
                w.created_at,
                u.id AS user_id,
                u.username,
                u.bio,
                COUNT(DISTINCT l.id) AS like_count,
                COUNT(DISTINCT c.id) AS comment_count,
                (my_likes.id IS NOT NULL) AS is_liked
            FROM workouts w
            JOIN users u ON w.user_id = u.id
            LEFT JOIN likes l ON l.workout_id = w.id
            LEFT JOIN comments c ON c.workout_id = w.id
            LEFT JOIN likes my_likes ON my_likes.workout_id = w.id AND my_likes.user_id = $1
            WHERE w.is_public
            GROUP BY w.id, u.id, my_likes.id
            ORDER BY w.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(actor)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
