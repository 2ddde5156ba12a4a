//! Business logic services.
//!
//! - [`auth`] - Player registration and login
//! - [`base`] - Base loading and attack-mode side effects

pub mod auth;
pub mod base;
