use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::{ExerciseFilter, ExercisesStore};
use crate::error::ApiError;
use crate::pagination::Pagination;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExerciseListQuery {
    pub muscle_group: Option<String>,
    pub equipment_type: Option<String>,
    pub search: Option<String>,
    // serde(flatten) breaks query-string number parsing, so the pagination
    // fields are spelled out here
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/exercises - browse the catalog with optional filters
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ExerciseListQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = ExerciseFilter {
        muscle_group: query.muscle_group.clone(),
        equipment_type: query.equipment_type.clone(),
        search: query.search.clone(),
    };

    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };

    let store = ExercisesStore::new(state.pool.clone());
    let exercises = store.list(&filter, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "exercises": exercises,
        "count": exercises.len(),
        "filters": {
            "muscle_group": query.muscle_group,
            "equipment_type": query.equipment_type,
            "search": query.search
        }
    })))
}

/// GET /api/exercises/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let store = ExercisesStore::new(state.pool.clone());
    let exercise = store
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;

    Ok(Json(json!({ "exercise": exercise })))
}

/// GET /api/exercises/muscle-groups
pub async fn muscle_groups(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = ExercisesStore::new(state.pool.clone());
    let muscle_groups = store.muscle_groups().await?;
    Ok(Json(json!({ "muscle_groups": muscle_groups })))
}

/// GET /api/exercises/equipment-types
pub async fn equipment_types(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = ExercisesStore::new(state.pool.clone());
    let equipment_types = store.equipment_types().await?;
    Ok(Json(json!({ "equipment_types": equipment_types })))
}

/// GET /api/exercises/muscle-group/:muscle_group
pub async fn by_muscle_group(
    State(state): State<AppState>,
    Path(muscle_group): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let filter = ExerciseFilter {
        muscle_group: Some(muscle_group.clone()),
        ..Default::default()
    };

    let store = ExercisesStore::new(state.pool.clone());
    let exercises = store.list(&filter, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "exercises": exercises,
        "count": exercises.len(),
        "muscle_group": muscle_group
    })))
}

/// GET /api/exercises/equipment/:equipment_type
pub async fn by_equipment_type(
    State(state): State<AppState>,
    Path(equipment_type): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let filter = ExerciseFilter {
        equipment_type: Some(equipment_type.clone()),
        ..Default::default()
    };

    let store = ExercisesStore::new(state.pool.clone());
    let exercises = store.list(&filter, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "exercises": exercises,
        "count": exercises.len(),
        "equipment_type": equipment_type
    })))
}
