//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                - Liveness check
//! GET  /health/ready          - Readiness check (database)
//!
//! # Player
//! POST /api/player/register   - Create account and log in
//! POST /api/player/login      - Log in
//! POST /api/player/logout     - Log out
//!
//! # Base (requires auth)
//! POST /api/base/load         - Load a base in build, view or attack mode
//! ```

pub mod base;
pub mod player;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the player account routes router.
pub fn player_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(player::register))
        .route("/login", post(player::login))
        .route("/logout", post(player::logout))
}

/// Create the base routes router.
pub fn base_routes() -> Router<AppState> {
    Router::new().route("/load", post(base::load))
}

/// Create all routes for the game server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/player", player_routes())
        .nest("/api/base", base_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
