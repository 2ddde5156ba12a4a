//! Domain models for the game server.
//!
//! - [`user`] - Player accounts
//! - [`save`] - Base saves and the default-save factory
//! - [`cell`] - Worlds and world map cells
//! - [`frontend`] - Filtering of server-only fields before serialization
//! - [`session`] - Session-stored identity

pub mod cell;
pub mod frontend;
pub mod save;
pub mod session;
pub mod user;

pub use cell::{NewWorldMapCell, World, WorldMapCell};
pub use frontend::{FrontendFilterError, FrontendKeys, filter_frontend_keys};
pub use save::{NewSave, Save};
pub use session::{CurrentPlayer, keys as session_keys};
pub use user::User;
