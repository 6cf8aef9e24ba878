use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::{SocialStore, UsersStore, WorkoutsStore};
use crate::error::ApiError;
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::pagination::Pagination;
use crate::policy;
use crate::state::AppState;

// ==================== Follows ====================

/// POST /api/social/follow/:user_id
pub async fn follow(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !policy::can_follow(auth.user_id, user_id) {
        return Err(ApiError::validation_error("Cannot follow yourself", None));
    }

    let users = UsersStore::new(state.pool.clone());
    if !users.exists(user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    let social = SocialStore::new(state.pool.clone());
    if !social.follow(auth.user_id, user_id).await? {
        return Err(ApiError::conflict("Already following this user"));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Successfully followed user" })),
    ))
}

/// DELETE /api/social/follow/:user_id
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    if !social.unfollow(auth.user_id, user_id).await? {
        return Err(ApiError::not_found("Follow relationship not found"));
    }

    Ok(Json(json!({ "message": "Successfully unfollowed user" })))
}

/// GET /api/social/followers/:user_id
pub async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let followers = social.followers(user_id, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "followers": followers,
        "count": followers.len()
    })))
}

/// GET /api/social/following/:user_id
pub async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let following = social.following(user_id, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "following": following,
        "count": following.len()
    })))
}

/// GET /api/social/follow-status/:user_id
pub async fn follow_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let is_following = social.is_following(auth.user_id, user_id).await?;

    Ok(Json(json!({ "is_following": is_following })))
}

// ==================== Likes ====================

/// POST /api/social/like/:workout_id
pub async fn like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let workouts = WorkoutsStore::new(state.pool.clone());
    let workout = workouts
        .find_by_id(workout_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;

    if !policy::can_act_on_workout_socially(&workout) {
        return Err(ApiError::forbidden("Cannot like private workout"));
    }

    let social = SocialStore::new(state.pool.clone());
    if !social.like(auth.user_id, workout_id).await? {
        return Err(ApiError::conflict("Already liked this workout"));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Workout liked successfully" })),
    ))
}

/// DELETE /api/social/like/:workout_id
pub async fn unlike(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    if !social.unlike(auth.user_id, workout_id).await? {
        return Err(ApiError::not_found("Like not found"));
    }

    Ok(Json(json!({ "message": "Workout unliked successfully" })))
}

/// GET /api/social/likes/:workout_id
pub async fn likes(
    State(state): State<AppState>,
    Path(workout_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let likes = social.likes(workout_id, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "likes": likes,
        "count": likes.len()
    })))
}

/// GET /api/social/like-status/:workout_id
pub async fn like_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let is_liked = social.has_liked(auth.user_id, workout_id).await?;

    Ok(Json(json!({ "is_liked": is_liked })))
}

// ==================== Comments ====================

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// POST /api/social/comment/:id (id = workout id)
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let content = payload
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::missing_field("content", "Comment content is required"))?;

    let workouts = WorkoutsStore::new(state.pool.clone());
    let workout = workouts
        .find_by_id(workout_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;

    if !policy::can_act_on_workout_socially(&workout) {
        return Err(ApiError::forbidden("Cannot comment on private workout"));
    }

    let social = SocialStore::new(state.pool.clone());
    let comment = social.add_comment(auth.user_id, workout_id, content).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment added successfully",
            "comment": comment
        })),
    ))
}

/// GET /api/social/comments/:workout_id - chronological reading order
pub async fn comments(
    State(state): State<AppState>,
    Path(workout_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let comments = social.comments(workout_id, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "comments": comments,
        "count": comments.len()
    })))
}

/// DELETE /api/social/comment/:id (id = comment id; author only)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    if !social.delete_comment(auth.user_id, comment_id).await? {
        // Missing and someone-else's comments answer identically
        return Err(ApiError::not_found("Comment not found or not authorized"));
    }

    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}

// ==================== Feed ====================

/// GET /api/social/feed - public workouts from followed users
pub async fn feed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let feed = social.feed(auth.user_id, page.limit(), page.offset()).await?;

    Ok(Json(json!({
        "feed": feed,
        "count": feed.len()
    })))
}

/// GET /api/social/discover - all public workouts; works anonymously
pub async fn discover(
    State(state): State<AppState>,
    Extension(maybe_auth): Extension<MaybeAuthUser>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let social = SocialStore::new(state.pool.clone());
    let workouts = social
        .discover(maybe_auth.user_id(), page.limit(), page.offset())
        .await?;

    Ok(Json(json!({
        "workouts": workouts,
        "count": workouts.len()
    })))
}
