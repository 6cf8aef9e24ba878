use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::UsersStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut field_errors = HashMap::new();
    let username = non_empty(payload.username.as_deref());
    let email = non_empty(payload.email.as_deref());
    let password = non_empty(payload.password.as_deref());

    if username.is_none() {
        field_errors.insert("username".to_string(), "This field is required".to_string());
    }
    if email.is_none() {
        field_errors.insert("email".to_string(), "This field is required".to_string());
    }
    if password.is_none() {
        field_errors.insert("password".to_string(), "This field is required".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Username, email and password are required",
            Some(field_errors),
        ));
    }

    let (username, email, password) = (username.unwrap(), email.unwrap(), password.unwrap());
    let cost = config::config().security.bcrypt_cost;
    let password_hash = bcrypt::hash(password, cost)?;

    let users = UsersStore::new(state.pool.clone());
    let user = users
        .create(
            username,
            email,
            &password_hash,
            payload.bio.as_deref().unwrap_or(""),
        )
        .await?;

    let token = generate_jwt(Claims::new(user.id, user.username.clone()))?;
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "token": token,
            "user": user.public_profile()
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(username), Some(password)) = (
        non_empty(payload.username.as_deref()),
        non_empty(payload.password.as_deref()),
    ) else {
        return Err(ApiError::validation_error(
            "Username and password are required",
            None,
        ));
    };

    let users = UsersStore::new(state.pool.clone());
    let user = users
        .find_by_username(username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    // Same response for unknown user and wrong password
    if !bcrypt::verify(password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = generate_jwt(Claims::new(user.id, user.username.clone()))?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user.public_profile()
    })))
}

/// GET /api/auth/whoami - echo the authenticated identity
pub async fn whoami(Extension(auth): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "user": {
            "id": auth.user_id,
            "username": auth.username
        }
    }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
