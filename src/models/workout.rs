use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A workout session. Owned by `user_id` from creation; the owner never
/// changes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub duration: Option<i32>,
    pub notes: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Workout list entry with its exercise count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutSummary {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub duration: Option<i32>,
    pub notes: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub exercise_count: i64,
}

/// Link row between a workout and a catalog exercise.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub order_in_workout: i32,
}

/// A single set performed for one workout exercise.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Set {
    pub id: i64,
    pub workout_exercise_id: i64,
    pub set_number: i32,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub rest_time: Option<i32>,
    pub notes: String,
}

/// One exercise inside a workout detail view, joined to the catalog and
/// carrying its sets in `set_number` order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutExerciseDetail {
    pub workout_exercise_id: i64,
    pub order_in_workout: i32,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub exercise_description: String,
    pub muscle_group: String,
    pub equipment_type: String,
    #[sqlx(skip)]
    pub sets: Vec<Set>,
}

/// Full workout aggregate: the workout plus its exercises and their sets.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub exercises: Vec<WorkoutExerciseDetail>,
}
