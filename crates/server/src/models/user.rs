//! Player account types.

use chrono::{DateTime, Utc};

use outpost_core::{SaveId, UserId, Username};

/// A player account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login and display name.
    pub username: Username,
    /// The player's active base, once one has been created.
    pub save_id: Option<SaveId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
