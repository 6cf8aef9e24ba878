use sqlx::{PgPool, QueryBuilder};

use super::StoreError;
use crate::models::Exercise;

/// Optional filters for catalog browsing.
#[derive(Debug, Default)]
pub struct ExerciseFilter {
    pub muscle_group: Option<String>,
    pub equipment_type: Option<String>,
    pub search: Option<String>,
}

/// Exercise catalog reads. The catalog is reference data; there are no user
/// writes here.
pub struct ExercisesStore {
    pool: PgPool,
}

impl ExercisesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List exercises with optional filtering, ordered by muscle group then
    /// name.
    pub async fn list(
        &self,
        filter: &ExerciseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Exercise>, StoreError> {
        let mut qb = QueryBuilder::new(
            "SELECT id, name, description, muscle_group, equipment_type, created_at FROM exercises",
        );

        let mut first = true;
        let mut push_clause = |qb: &mut QueryBuilder<sqlx::Postgres>| {
            if first {
                qb.push(" WHERE ");
                first = false;
            } else {
                qb.push(" AND ");
            }
        };

        if let Some(muscle_group) = &filter.muscle_group {
            push_clause(&mut qb);
            qb.push("muscle_group = ").push_bind(muscle_group);
        }
        if let Some(equipment_type) = &filter.equipment_type {
            push_clause(&mut qb);
            qb.push("equipment_type = ").push_bind(equipment_type);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            push_clause(&mut qb);
            qb.push("(name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY muscle_group, name LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let exercises = qb.build_query_as::<Exercise>().fetch_all(&self.pool).await?;
        Ok(exercises)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Exercise>, StoreError> {
        let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(exercise)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM exercises WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn muscle_groups(&self) -> Result<Vec<String>, StoreError> {
        let groups =
            sqlx::query_scalar("SELECT DISTINCT muscle_group FROM exercises ORDER BY muscle_group")
                .fetch_all(&self.pool)
                .await?;
        Ok(groups)
    }

    pub async fn equipment_types(&self) -> Result<Vec<String>, StoreError> {
        let types = sqlx::query_scalar(
            "SELECT DISTINCT equipment_type FROM exercises ORDER BY equipment_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }
}
