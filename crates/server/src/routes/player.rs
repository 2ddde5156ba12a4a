//! Player account route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use outpost_core::{SaveId, UserId};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_player, set_current_player};
use crate::models::{CurrentPlayer, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Credentials for register and login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Public view of a player.
#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub id: UserId,
    pub username: String,
    pub save_id: Option<SaveId>,
}

impl From<&User> for PlayerResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_owned(),
            save_id: user.save_id,
        }
    }
}

/// Create an account and log it in.
///
/// # Errors
///
/// Returns 400 for an invalid username or weak password and 409 if the
/// username is taken.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<Credentials>,
) -> Result<(StatusCode, Json<PlayerResponse>)> {
    let user = AuthService::new(state.pool())
        .register(&form.username, &form.password)
        .await?;

    start_session(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(PlayerResponse::from(&user))))
}

/// Log in with username and password.
///
/// # Errors
///
/// Returns 401 on bad credentials.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<Credentials>,
) -> Result<Json<PlayerResponse>> {
    let user = AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
        .inspect_err(|e| tracing::info!(username = %form.username, error = %e, "Login failed"))?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "Player logged in");

    Ok(Json(PlayerResponse::from(&user)))
}

/// Log out.
///
/// # Errors
///
/// Returns 500 if the session cannot be deleted.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_player(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let player = CurrentPlayer {
        id: user.id,
        username: user.username.clone(),
    };

    set_current_player(session, &player)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, Some(user.username.as_str()));

    Ok(())
}
