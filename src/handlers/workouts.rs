use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::workouts::{SetFields, WorkoutFields};
use crate::database::{ExercisesStore, WorkoutsStore};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::pagination::Pagination;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkoutRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub duration: Option<i32>,
    pub notes: Option<String>,
    pub is_public: Option<bool>,
}

impl WorkoutRequest {
    /// PUT-style full replace: title and date are required, everything else
    /// falls back to its column default.
    fn into_fields(self) -> Result<WorkoutFields, ApiError> {
        let mut field_errors = HashMap::new();

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if title.is_none() {
            field_errors.insert("title".to_string(), "This field is required".to_string());
        }

        let date = match self.date.as_deref() {
            None => {
                field_errors.insert("date".to_string(), "This field is required".to_string());
                None
            }
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => Some(date),
                Err(_) => {
                    field_errors.insert(
                        "date".to_string(),
                        "Expected an ISO date (YYYY-MM-DD)".to_string(),
                    );
                    None
                }
            },
        };

        if !field_errors.is_empty() {
            return Err(ApiError::validation_error(
                "Title and date are required",
                Some(field_errors),
            ));
        }

        Ok(WorkoutFields {
            title: title.unwrap().to_string(),
            date: date.unwrap(),
            duration: self.duration,
            notes: self.notes.unwrap_or_default(),
            is_public: self.is_public.unwrap_or(true),
        })
    }
}

/// POST /api/workouts
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<WorkoutRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let fields = payload.into_fields()?;
    let store = WorkoutsStore::new(state.pool.clone());
    let workout = store.create(auth.user_id, &fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Workout created successfully",
            "workout": workout
        })),
    ))
}

/// GET /api/workouts - the actor's workouts with exercise counts
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let store = WorkoutsStore::new(state.pool.clone());
    let workouts = store
        .list_for_user(auth.user_id, page.limit(), page.offset())
        .await?;

    Ok(Json(json!({
        "workouts": workouts,
        "count": workouts.len()
    })))
}

/// GET /api/workouts/:id - workout with exercises and sets
///
/// Scoped to the owner: a workout that exists but belongs to someone else
/// reads as not found.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let store = WorkoutsStore::new(state.pool.clone());
    let detail = store
        .detail(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;

    Ok(Json(json!({ "workout": detail })))
}

/// PUT /api/workouts/:id - full-field replace
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<WorkoutRequest>,
) -> Result<Json<Value>, ApiError> {
    let fields = payload.into_fields()?;
    let store = WorkoutsStore::new(state.pool.clone());
    let workout = store
        .update(auth.user_id, id, &fields)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;

    Ok(Json(json!({
        "message": "Workout updated successfully",
        "workout": workout
    })))
}

/// DELETE /api/workouts/:id - cascades to exercise links and sets
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let store = WorkoutsStore::new(state.pool.clone());
    if !store.delete(auth.user_id, id).await? {
        return Err(ApiError::not_found("Workout not found"));
    }

    Ok(Json(json!({ "message": "Workout deleted successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct AddExerciseRequest {
    pub exercise_id: Option<i64>,
    pub order_in_workout: Option<i32>,
}

/// POST /api/workouts/:id/exercises
pub async fn add_exercise(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<AddExerciseRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let exercise_id = payload
        .exercise_id
        .ok_or_else(|| ApiError::missing_field("exercise_id", "Exercise ID is required"))?;

    let workouts = WorkoutsStore::new(state.pool.clone());
    if !workouts.is_owned(auth.user_id, id).await? {
        return Err(ApiError::not_found("Workout not found"));
    }

    let exercises = ExercisesStore::new(state.pool.clone());
    if !exercises.exists(exercise_id).await? {
        return Err(ApiError::not_found("Exercise not found"));
    }

    let workout_exercise = workouts
        .add_exercise(id, exercise_id, payload.order_in_workout)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Exercise added to workout successfully",
            "workout_exercise": workout_exercise
        })),
    ))
}

/// DELETE /api/workouts/:workout_id/exercises/:exercise_id
pub async fn remove_exercise(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let store = WorkoutsStore::new(state.pool.clone());
    if !store.is_owned(auth.user_id, workout_id).await? {
        return Err(ApiError::not_found("Workout not found"));
    }

    if !store.remove_exercise(workout_id, exercise_id).await? {
        return Err(ApiError::not_found("Exercise not found in workout"));
    }

    Ok(Json(json!({
        "message": "Exercise removed from workout successfully"
    })))
}

#[derive(Debug, Deserialize)]
pub struct AddSetRequest {
    pub set_number: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub rest_time: Option<i32>,
    pub notes: Option<String>,
}

/// POST /api/workouts/exercises/:workout_exercise_id/sets
pub async fn add_set(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workout_exercise_id): Path<i64>,
    Json(payload): Json<AddSetRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let set_number = match payload.set_number {
        Some(n) if n > 0 => n,
        Some(_) => {
            return Err(ApiError::validation_error(
                "Set number must be a positive integer",
                None,
            ))
        }
        None => return Err(ApiError::missing_field("set_number", "Set number is required")),
    };

    let store = WorkoutsStore::new(state.pool.clone());
    if !store
        .owns_workout_exercise(auth.user_id, workout_exercise_id)
        .await?
    {
        return Err(ApiError::not_found("Workout exercise not found"));
    }

    let fields = SetFields {
        reps: payload.reps,
        weight: payload.weight,
        rest_time: payload.rest_time,
        notes: payload.notes.unwrap_or_default(),
    };
    let set = store.add_set(workout_exercise_id, set_number, &fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Set added successfully",
            "set": set
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSetRequest {
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub rest_time: Option<i32>,
    pub notes: Option<String>,
}

/// PUT /api/workouts/sets/:set_id - full-field replace
pub async fn update_set(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(set_id): Path<i64>,
    Json(payload): Json<UpdateSetRequest>,
) -> Result<Json<Value>, ApiError> {
    let fields = SetFields {
        reps: payload.reps,
        weight: payload.weight,
        rest_time: payload.rest_time,
        notes: payload.notes.unwrap_or_default(),
    };

    let store = WorkoutsStore::new(state.pool.clone());
    let set = store
        .update_set(auth.user_id, set_id, &fields)
        .await?
        .ok_or_else(|| ApiError::not_found("Set not found"))?;

    Ok(Json(json!({
        "message": "Set updated successfully",
        "set": set
    })))
}

/// DELETE /api/workouts/sets/:set_id
pub async fn delete_set(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(set_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let store = WorkoutsStore::new(state.pool.clone());
    if !store.delete_set(auth.user_id, set_id).await? {
        return Err(ApiError::not_found("Set not found"));
    }

    Ok(Json(json!({ "message": "Set deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workout_request_requires_title_and_date() {
        let req = WorkoutRequest {
            title: None,
            date: None,
            duration: None,
            notes: None,
            is_public: None,
        };
        let err = req.into_fields().unwrap_err();
        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["field_errors"]["title"], "This field is required");
        assert_eq!(body["field_errors"]["date"], "This field is required");
    }

    #[test]
    fn workout_request_rejects_malformed_dates() {
        let req = WorkoutRequest {
            title: Some("Leg Day".to_string()),
            date: Some("01/01/2024".to_string()),
            duration: None,
            notes: None,
            is_public: None,
        };
        let err = req.into_fields().unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["date"], "Expected an ISO date (YYYY-MM-DD)");
    }

    #[test]
    fn workout_request_defaults_to_public_with_empty_notes() {
        let req = WorkoutRequest {
            title: Some("Leg Day".to_string()),
            date: Some("2024-01-01".to_string()),
            duration: Some(45),
            notes: None,
            is_public: None,
        };
        let fields = req.into_fields().unwrap();
        assert!(fields.is_public);
        assert_eq!(fields.notes, "");
        assert_eq!(fields.duration, Some(45));
    }
}
