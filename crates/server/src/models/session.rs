//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use outpost_core::{UserId, Username};

/// Session-stored player identity.
///
/// Minimal data stored in the session to identify the logged-in player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentPlayer {
    /// Player's database ID.
    pub id: UserId,
    /// Player's username.
    pub username: Username,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in player.
    pub const CURRENT_PLAYER: &str = "current_player";
}
