use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::database::UsersStore;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/users/:id - public profile with social counters
pub async fn profile_get(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let users = UsersStore::new(state.pool.clone());
    let profile = users
        .profile(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({ "user": profile })))
}
