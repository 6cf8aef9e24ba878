use sqlx::PgPool;

/// Shared application state handed to every handler.
///
/// The pool is opened once at startup and closed at shutdown; handlers never
/// reach for ambient globals, which keeps request handling stateless and the
/// process horizontally scalable.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
