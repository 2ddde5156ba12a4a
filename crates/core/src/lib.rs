//! Outpost Core - Shared domain types.
//!
//! This crate provides common types used across all Outpost components:
//! - `server` - Game API server (base loading, player sessions)
//! - `cli` - Command-line tools for migrations and world management
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP clients. The optional `postgres` feature adds `sqlx`
//! encode/decode support for the ID types.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, base modes, map coordinates and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
