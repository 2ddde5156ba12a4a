//! Player authentication extractor and session helpers.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentPlayer, session_keys};

/// Extractor that requires a logged-in player.
///
/// Rejects with a JSON 401 when the session has no player.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(player): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", player.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentPlayer);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_owned()))?;

        let player: CurrentPlayer = session
            .get(session_keys::CURRENT_PLAYER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("Login required".to_owned()))?;

        Ok(Self(player))
    }
}

/// Store the logged-in player in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_player(
    session: &Session,
    player: &CurrentPlayer,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_PLAYER, player).await
}

/// Drop the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn clear_current_player(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
