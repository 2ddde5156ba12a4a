//! World map types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use outpost_core::{CellId, Coordinates, SaveId, UserId, WorldId};

/// `base_type` of a cell created for a base that was attacked before being placed
/// (tribe and other computer-controlled bases).
pub const ATTACKED_BASE_TYPE: i32 = 1;

/// Placement of one base on a world map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct WorldMapCell {
    pub cell_id: CellId,
    pub world_id: WorldId,
    pub x: i32,
    pub y: i32,
    pub base_id: SaveId,
    /// Owner of the base occupying the cell.
    pub uid: UserId,
    pub base_type: i32,
}

impl WorldMapCell {
    /// Position of the cell.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.x, self.y)
    }
}

/// Attributes of a cell that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorldMapCell {
    pub world_id: WorldId,
    pub coordinates: Coordinates,
    pub base_id: SaveId,
    pub uid: UserId,
    pub base_type: i32,
}

/// A world map instance.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct World {
    pub id: WorldId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
