use sqlx::PgPool;

use super::{is_unique_violation, StoreError};
use crate::models::{User, UserProfile};

/// User persistence operations
pub struct UsersStore {
    pool: PgPool,
}

impl UsersStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Duplicate username/email surfaces as a conflict
    /// detected by the unique constraints, not by a pre-check.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        bio: &str,
    ) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (username, email, password_hash, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(bio)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e, Some("users_username_key")) => {
                Err(StoreError::Conflict("Username is already taken".to_string()))
            }
            Err(e) if is_unique_violation(&e, Some("users_email_key")) => {
                Err(StoreError::Conflict("Email is already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn exists(&self, user_id: i64) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Public profile with follower/following/workout counters.
    pub async fn profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r"
            SELECT
                u.id,
                u.username,
                u.bio,
                u.created_at,
                (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS follower_count,
                (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count,
                (SELECT COUNT(*) FROM workouts w WHERE w.user_id = u.id) AS workout_count
            FROM users u
            WHERE u.id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }
}
