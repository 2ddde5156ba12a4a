//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Error bodies are JSON: `{"error": <code>, "message": <text>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::FrontendFilterError;
use crate::services::auth::AuthError;
use crate::services::base::BaseLoadError;

/// Code shared by every failure to produce a base for the client.
pub const SAVE_FAILURE_CODE: &str = "save_failure";
const SAVE_FAILURE_MESSAGE: &str = "Unable to load base";

/// Application-level error type for the game server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Base load failed.
    #[error("Base load error: {0}")]
    BaseLoad(#[from] BaseLoadError),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FrontendFilterError> for AppError {
    fn from(err: FrontendFilterError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
                | Self::BaseLoad(BaseLoadError::Repository(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidUsername(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BaseLoad(err) => match err {
                BaseLoadError::UnknownPlayer => StatusCode::UNAUTHORIZED,
                BaseLoadError::InvalidBaseId(_) => StatusCode::BAD_REQUEST,
                BaseLoadError::NotOwner => StatusCode::FORBIDDEN,
                BaseLoadError::SaveNotFound => StatusCode::NOT_FOUND,
                BaseLoadError::NoWorld
                | BaseLoadError::InvalidHomebase(_)
                | BaseLoadError::CellOccupied { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                BaseLoadError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                BaseLoadError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal_error",
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "invalid_credentials",
                AuthError::UserAlreadyExists => "user_exists",
                AuthError::WeakPassword(_) => "weak_password",
                AuthError::InvalidUsername(_) => "invalid_username",
                AuthError::Repository(_) | AuthError::PasswordHash => "internal_error",
            },
            Self::BaseLoad(err) => match err {
                BaseLoadError::UnknownPlayer => "unauthorized",
                BaseLoadError::InvalidBaseId(_) => "invalid_base_id",
                BaseLoadError::NotOwner | BaseLoadError::SaveNotFound => SAVE_FAILURE_CODE,
                BaseLoadError::NoWorld
                | BaseLoadError::InvalidHomebase(_)
                | BaseLoadError::CellOccupied { .. } => "map_placement",
                BaseLoadError::Repository(RepositoryError::Conflict(_)) => "conflict",
                BaseLoadError::Repository(_) => "internal_error",
            },
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
        }
    }

    fn message(&self) -> String {
        // Don't expose internal error details to clients
        if self.is_server_error() {
            return "Internal server error".to_owned();
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UserAlreadyExists => "That username is already taken".to_owned(),
                AuthError::WeakPassword(msg) => msg.clone(),
                other => other.to_string(),
            },
            Self::BaseLoad(err) => match err {
                BaseLoadError::NotOwner | BaseLoadError::SaveNotFound => {
                    SAVE_FAILURE_MESSAGE.to_owned()
                }
                BaseLoadError::Repository(RepositoryError::Conflict(_)) => {
                    "Base was placed by another request, please retry".to_owned()
                }
                BaseLoadError::CellOccupied { .. } => {
                    "Another base already occupies this map position".to_owned()
                }
                other => other.to_string(),
            },
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.code(),
            message: self.message(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with players.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for player actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("base", "Loaded base", Some(&[("mode", "attack")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_owned(),
                serde_json::Value::String((*value).to_owned()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
