//! Base load error types.

use thiserror::Error;

use outpost_core::{Coordinates, CoordinatesError, SaveId};

use crate::db::RepositoryError;

/// Errors that can occur while loading a base.
#[derive(Debug, Error)]
pub enum BaseLoadError {
    /// The session refers to a player that no longer exists.
    #[error("unknown player")]
    UnknownPlayer,

    /// `baseid` is not a non-negative integer.
    #[error("invalid base id: {0:?}")]
    InvalidBaseId(String),

    /// Build mode was requested for someone else's base.
    #[error("base belongs to another player")]
    NotOwner,

    /// No save exists for the requested base id.
    #[error("save not found")]
    SaveNotFound,

    /// The attacker has no world to place the target in.
    #[error("attacker has no world for map placement")]
    NoWorld,

    /// The target's home-base coordinates cannot be parsed.
    #[error("invalid homebase: {0}")]
    InvalidHomebase(#[from] CoordinatesError),

    /// Another base already sits at the target's home coordinates.
    #[error("map cell {at} is occupied by base {occupant}")]
    CellOccupied { at: Coordinates, occupant: SaveId },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
