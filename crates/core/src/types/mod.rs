//! Core types for Outpost.
//!
//! This module provides type-safe wrappers for common game concepts.

pub mod coords;
pub mod id;
pub mod mode;
pub mod username;

pub use coords::{Coordinates, CoordinatesError};
pub use id::*;
pub use mode::BaseMode;
pub use username::{Username, UsernameError};
