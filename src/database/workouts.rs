use chrono::NaiveDate;
use sqlx::PgPool;

use super::{is_unique_violation, StoreError};
use crate::models::{Set, Workout, WorkoutDetail, WorkoutExercise, WorkoutExerciseDetail, WorkoutSummary};

/// Fields accepted when creating or replacing a workout.
#[derive(Debug)]
pub struct WorkoutFields {
    pub title: String,
    pub date: NaiveDate,
    pub duration: Option<i32>,
    pub notes: String,
    pub is_public: bool,
}

/// Fields accepted when creating or replacing a set.
#[derive(Debug)]
pub struct SetFields {
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub rest_time: Option<i32>,
    pub notes: String,
}

/// Workout aggregate persistence: workouts, their exercise links and sets.
///
/// Every mutating query is scoped by the owning user id, so a row that exists
/// but belongs to someone else is indistinguishable from a missing row.
pub struct WorkoutsStore {
    pool: PgPool,
}

impl WorkoutsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: i64, fields: &WorkoutFields) -> Result<Workout, StoreError> {
        let workout = sqlx::query_as::<_, Workout>(
            r"
            INSERT INTO workouts (user_id, title, date, duration, notes, is_public)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(owner)
        .bind(&fields.title)
        .bind(fields.date)
        .bind(fields.duration)
        .bind(&fields.notes)
        .bind(fields.is_public)
        .fetch_one(&self.pool)
        .await?;
        Ok(workout)
    }

    /// The actor's own workouts with per-workout exercise counts, newest
    /// training date first.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutSummary>, StoreError> {
        let workouts = sqlx::query_as::<_, WorkoutSummary>(
            r"
            SELECT
                w.*,
                COUNT(we.id) AS exercise_count
            FROM workouts w
            LEFT JOIN workout_exercises we ON w.id = we.workout_id
            WHERE w.user_id = $1
            GROUP BY w.id
            ORDER BY w.date DESC, w.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(workouts)
    }

    /// Load a workout by id without ownership scoping. Used where visibility,
    /// not ownership, decides access (likes, comments).
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Workout>, StoreError> {
        let workout = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(workout)
    }

    /// Load the full aggregate for an owned workout: exercises in
    /// `order_in_workout` order, each with its sets in `set_number` order.
    pub async fn detail(&self, actor: i64, id: i64) -> Result<Option<WorkoutDetail>, StoreError> {
        let workout = sqlx::query_as::<_, Workout>(
            "SELECT * FROM workouts WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await?;

        let Some(workout) = workout else {
            return Ok(None);
        };

        let mut exercises = sqlx::query_as::<_, WorkoutExerciseDetail>(
            r"
            SELECT
                we.id AS workout_exercise_id,
                we.order_in_workout,
                e.id AS exercise_id,
                e.name AS exercise_name,
                e.description AS exercise_description,
                e.muscle_group,
                e.equipment_type
            FROM workout_exercises we
            JOIN exercises e ON we.exercise_id = e.id
            WHERE we.workout_id = $1
            ORDER BY we.order_in_workout
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        // One query per exercise; fine at this scale
        for exercise in &mut exercises {
            exercise.sets = sqlx::query_as::<_, Set>(
                "SELECT * FROM sets WHERE workout_exercise_id = $1 ORDER BY set_number",
            )
            .bind(exercise.workout_exercise_id)
            .fetch_all(&self.pool)
            .await?;
        }

        Ok(Some(WorkoutDetail { workout, exercises }))
    }

    /// Full-field replace of an owned workout. A single scoped UPDATE keeps
    /// the ownership check and the write atomic; `None` means missing or not
    /// owned.
    pub async fn update(
        &self,
        actor: i64,
        id: i64,
        fields: &WorkoutFields,
    ) -> Result<Option<Workout>, StoreError> {
        let workout = sqlx::query_as::<_, Workout>(
            r"
            UPDATE workouts
            SET title = $1, date = $2, duration = $3, notes = $4, is_public = $5
            WHERE id = $6 AND user_id = $7
            RETURNING *
            ",
        )
        .bind(&fields.title)
        .bind(fields.date)
        .bind(fields.duration)
        .bind(&fields.notes)
        .bind(fields.is_public)
        .bind(id)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await?;
        Ok(workout)
    }

    /// Delete an owned workout. The store cascades to its exercise links and
    /// their sets.
    pub async fn delete(&self, actor: i64, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(actor)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_owned(&self, actor: i64, id: i64) -> Result<bool, StoreError> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(actor)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }

    /// Link an exercise into a workout. When `order` is absent the next order
    /// value is computed inside the INSERT itself; the unique constraint on
    /// `(workout_id, order_in_workout)` catches concurrent assignments and the
    /// insert is retried with a freshly computed value.
    pub async fn add_exercise(
        &self,
        workout_id: i64,
        exercise_id: i64,
        order: Option<i32>,
    ) -> Result<WorkoutExercise, StoreError> {
        if let Some(order) = order {
            let result = sqlx::query_as::<_, WorkoutExercise>(
                r"
                INSERT INTO workout_exercises (workout_id, exercise_id, order_in_workout)
                VALUES ($1, $2, $3)
                RETURNING *
                ",
            )
            .bind(workout_id)
            .bind(exercise_id)
            .bind(order)
            .fetch_one(&self.pool)
            .await;

            return match result {
                Ok(link) => Ok(link),
                Err(e) if is_unique_violation(&e, Some("workout_exercises_order_key")) => Err(
                    StoreError::Conflict("Order is already used in this workout".to_string()),
                ),
                Err(e) => Err(e.into()),
            };
        }

        const MAX_ATTEMPTS: usize = 3;
        for attempt in 1..=MAX_ATTEMPTS {
            let result = sqlx::query_as::<_, WorkoutExercise>(
                r"
                INSERT INTO workout_exercises (workout_id, exercise_id, order_in_workout)
                SELECT $1, $2, COALESCE(MAX(order_in_workout), 0) + 1
                FROM workout_exercises
                WHERE workout_id = $1
                RETURNING *
                ",
            )
            .bind(workout_id)
            .bind(exercise_id)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(link) => return Ok(link),
                Err(e)
                    if is_unique_violation(&e, Some("workout_exercises_order_key"))
                        && attempt < MAX_ATTEMPTS =>
                {
                    tracing::debug!(workout_id, attempt, "order collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Conflict(
            "Could not assign an exercise order".to_string(),
        ))
    }

    /// Remove an exercise link from a workout; its sets cascade away.
    pub async fn remove_exercise(
        &self,
        workout_id: i64,
        exercise_id: i64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM workout_exercises WHERE workout_id = $1 AND exercise_id = $2",
        )
        .bind(workout_id)
        .bind(exercise_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ownership of a workout exercise resolves through its workout chain.
    pub async fn owns_workout_exercise(
        &self,
        actor: i64,
        workout_exercise_id: i64,
    ) -> Result<bool, StoreError> {
        let owned: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1
                FROM workout_exercises we
                JOIN workouts w ON we.workout_id = w.id
                WHERE we.id = $1 AND w.user_id = $2
            )
            ",
        )
        .bind(workout_exercise_id)
        .bind(actor)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }

    pub async fn add_set(
        &self,
        workout_exercise_id: i64,
        set_number: i32,
        fields: &SetFields,
    ) -> Result<Set, StoreError> {
        let set = sqlx::query_as::<_, Set>(
            r"
            INSERT INTO sets (workout_exercise_id, set_number, reps, weight, rest_time, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(workout_exercise_id)
        .bind(set_number)
        .bind(fields.reps)
        .bind(fields.weight)
        .bind(fields.rest_time)
        .bind(&fields.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(set)
    }

    /// Replace a set's fields. The UPDATE joins up the ownership chain so the
    /// check and the write are one atomic statement.
    pub async fn update_set(
        &self,
        actor: i64,
        set_id: i64,
        fields: &SetFields,
    ) -> Result<Option<Set>, StoreError> {
        let set = sqlx::query_as::<_, Set>(
            r"
            UPDATE sets s
            SET reps = $1, weight = $2, rest_time = $3, notes = $4
            FROM workout_exercises we
            JOIN workouts w ON we.workout_id = w.id
            WHERE s.id = $5 AND s.workout_exercise_id = we.id AND w.user_id = $6
            RETURNING s.*
            ",
        )
        .bind(fields.reps)
        .bind(fields.weight)
        .bind(fields.rest_time)
        .bind(&fields.notes)
        .bind(set_id)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await?;
        Ok(set)
    }

    pub async fn delete_set(&self, actor: i64, set_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            DELETE FROM sets s
            USING workout_exercises we, workouts w
            WHERE s.id = $1
              AND s.workout_exercise_id = we.id
              AND we.workout_id = w.id
              AND w.user_id = $2
            ",
        )
        .bind(set_id)
        .bind(actor)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
