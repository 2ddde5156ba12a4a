//! World map cell queries.

use sqlx::PgConnection;

use outpost_core::{Coordinates, SaveId, WorldId};

use super::RepositoryError;
use crate::models::{NewWorldMapCell, WorldMapCell};

/// Find the cell occupied by a base.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_base(
    conn: &mut PgConnection,
    base_id: SaveId,
) -> Result<Option<WorldMapCell>, RepositoryError> {
    let cell = sqlx::query_as::<_, WorldMapCell>(
        r"
        SELECT cell_id, world_id, x, y, base_id, uid, base_type
        FROM outpost.world_map_cell
        WHERE base_id = $1
        ",
    )
    .bind(base_id)
    .fetch_optional(conn)
    .await?;

    Ok(cell)
}

/// Find the cell at a position in a world.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_at(
    conn: &mut PgConnection,
    world_id: WorldId,
    at: Coordinates,
) -> Result<Option<WorldMapCell>, RepositoryError> {
    let cell = sqlx::query_as::<_, WorldMapCell>(
        r"
        SELECT cell_id, world_id, x, y, base_id, uid, base_type
        FROM outpost.world_map_cell
        WHERE world_id = $1 AND x = $2 AND y = $3
        ",
    )
    .bind(world_id)
    .bind(at.x)
    .bind(at.y)
    .fetch_optional(conn)
    .await?;

    Ok(cell)
}

/// Insert a cell.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the base already has a cell or the
/// coordinates are taken in that world.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut PgConnection,
    cell: &NewWorldMapCell,
) -> Result<WorldMapCell, RepositoryError> {
    let cell = sqlx::query_as::<_, WorldMapCell>(
        r"
        INSERT INTO outpost.world_map_cell (world_id, x, y, base_id, uid, base_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING cell_id, world_id, x, y, base_id, uid, base_type
        ",
    )
    .bind(cell.world_id)
    .bind(cell.coordinates.x)
    .bind(cell.coordinates.y)
    .bind(cell.base_id)
    .bind(cell.uid)
    .bind(cell.base_type)
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "world map cell"))?;

    Ok(cell)
}
