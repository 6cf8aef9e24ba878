use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Catalog exercise. Reference data, not owned by any user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub muscle_group: String,
    pub equipment_type: String,
    pub created_at: DateTime<Utc>,
}
