use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::{extract::State, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use workout_social_api::middleware::{jwt_auth_middleware, optional_auth_middleware};
use workout_social_api::state::AppState;
use workout_social_api::{config, database, handlers};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Workout Social API in {:?} mode", config.environment);

    let pool = database::connect_pool()
        .await
        .unwrap_or_else(|e| panic!("failed to initialize database: {}", e));
    let state = AppState::new(pool);

    let app = app(state.clone());

    // Allow tests or deployments to override port via env
    let port = std::env::var("WORKOUT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Workout Social API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    // Explicit pool lifecycle: opened at startup, closed here
    state.pool.close().await;
    tracing::info!("Database pool closed, shutting down");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("ctrl-c handler");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Optional auth: anonymous browsing allowed
        .merge(catalog_routes())
        // Mandatory auth
        .merge(workout_routes())
        .merge(social_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/auth/whoami",
            get(auth::whoami).route_layer(from_fn(jwt_auth_middleware)),
        )
}

fn catalog_routes() -> Router<AppState> {
    use handlers::{exercises, users};

    Router::new()
        .route("/api/exercises", get(exercises::list))
        .route("/api/exercises/muscle-groups", get(exercises::muscle_groups))
        .route("/api/exercises/equipment-types", get(exercises::equipment_types))
        .route(
            "/api/exercises/muscle-group/:muscle_group",
            get(exercises::by_muscle_group),
        )
        .route(
            "/api/exercises/equipment/:equipment_type",
            get(exercises::by_equipment_type),
        )
        .route("/api/exercises/:id", get(exercises::get))
        .route("/api/users/:id", get(users::profile_get))
        .route("/api/social/discover", get(handlers::social::discover))
        .route_layer(from_fn(optional_auth_middleware))
}

fn workout_routes() -> Router<AppState> {
    use handlers::workouts;

    Router::new()
        .route("/api/workouts", get(workouts::list).post(workouts::create))
        .route(
            "/api/workouts/:workout_id",
            get(workouts::get)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route("/api/workouts/:workout_id/exercises", post(workouts::add_exercise))
        .route(
            "/api/workouts/:workout_id/exercises/:exercise_id",
            delete(workouts::remove_exercise),
        )
        .route(
            "/api/workouts/exercises/:workout_exercise_id/sets",
            post(workouts::add_set),
        )
        .route(
            "/api/workouts/sets/:set_id",
            axum::routing::put(workouts::update_set).delete(workouts::delete_set),
        )
        .route_layer(from_fn(jwt_auth_middleware))
}

fn social_routes() -> Router<AppState> {
    use handlers::social;

    Router::new()
        .route(
            "/api/social/follow/:user_id",
            post(social::follow).delete(social::unfollow),
        )
        .route("/api/social/followers/:user_id", get(social::followers))
        .route("/api/social/following/:user_id", get(social::following))
        .route("/api/social/follow-status/:user_id", get(social::follow_status))
        .route(
            "/api/social/like/:workout_id",
            post(social::like).delete(social::unlike),
        )
        .route("/api/social/likes/:workout_id", get(social::likes))
        .route("/api/social/like-status/:workout_id", get(social::like_status))
        // POST takes a workout id, DELETE a comment id (shared path segment)
        .route(
            "/api/social/comment/:id",
            post(social::add_comment).delete(social::delete_comment),
        )
        .route("/api/social/comments/:workout_id", get(social::comments))
        .route("/api/social/feed", get(social::feed))
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "message": "Workout Social API is running!",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/auth/register, /api/auth/login (public), /api/auth/whoami (protected)",
            "exercises": "/api/exercises[/...] (optional auth)",
            "users": "/api/users/:id (optional auth)",
            "workouts": "/api/workouts[/...] (protected)",
            "social": "/api/social/* (protected, /api/social/discover optional auth)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "healthy",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
