use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

pub mod exercises;
pub mod social;
pub mod users;
pub mod workouts;

pub use exercises::{ExerciseFilter, ExercisesStore};
pub use social::SocialStore;
pub use users::UsersStore;
pub use workouts::WorkoutsStore;

/// Errors surfaced by the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Open the connection pool from `DATABASE_URL` and apply pending migrations.
pub async fn connect_pool() -> Result<PgPool, StoreError> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| StoreError::Migration("DATABASE_URL is not set".to_string()))?;

    let db_config = &crate::config::config().database;
    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(db_config.connection_timeout_secs))
        .connect(&url)
        .await?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    info!("Database pool ready");
    Ok(pool)
}

/// Ping the pool to confirm connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// True when `err` is a unique-constraint violation, optionally on a specific
/// named constraint. Used for atomic duplicate detection instead of
/// check-then-insert sequences.
pub fn is_unique_violation(err: &sqlx::Error, constraint: Option<&str>) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            if !db_err.is_unique_violation() {
                return false;
            }
            match constraint {
                Some(name) => db_err.constraint() == Some(name),
                None => true,
            }
        }
        _ => false,
    }
}
