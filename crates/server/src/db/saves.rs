//! Save queries.

use sqlx::PgConnection;
use sqlx::types::Json;

use outpost_core::{Coordinates, SaveId, WorldId};

use super::RepositoryError;
use crate::models::{NewSave, Save};

/// Get a save by its base save ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut PgConnection,
    id: SaveId,
) -> Result<Option<Save>, RepositoryError> {
    let save = sqlx::query_as::<_, Save>("SELECT * FROM outpost.save WHERE basesaveid = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(save)
}

/// Insert a new save and return the stored row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(conn: &mut PgConnection, save: &NewSave) -> Result<Save, RepositoryError> {
    let save = sqlx::query_as::<_, Save>(
        r"
        INSERT INTO outpost.save
            (saveuserid, name, basename, base_type, level, credits,
             homebase, protected, resources, buildingdata)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        ",
    )
    .bind(save.saveuserid)
    .bind(&save.name)
    .bind(&save.basename)
    .bind(&save.base_type)
    .bind(save.level)
    .bind(save.credits)
    .bind(&save.homebase)
    .bind(save.protected)
    .bind(Json(&save.resources))
    .bind(Json(&save.buildingdata))
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "save"))?;

    Ok(save)
}

/// Write back the mutable columns of a save.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the save doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(conn: &mut PgConnection, save: &Save) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE outpost.save
        SET name = $2,
            basename = $3,
            level = $4,
            credits = $5,
            homebase = $6,
            homebaseid = $7,
            worldid = $8,
            cellid = $9,
            attackid = $10,
            protected = $11,
            protection_expires_at = $12,
            resources = $13,
            buildingdata = $14,
            updated_at = NOW()
        WHERE basesaveid = $1
        ",
    )
    .bind(save.basesaveid)
    .bind(&save.name)
    .bind(&save.basename)
    .bind(save.level)
    .bind(save.credits)
    .bind(&save.homebase)
    .bind(save.homebaseid)
    .bind(save.worldid)
    .bind(save.cellid)
    .bind(save.attackid)
    .bind(save.protected)
    .bind(save.protection_expires_at)
    .bind(Json(&save.resources))
    .bind(Json(&save.buildingdata))
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Drop damage protection from every base placed at `at` in `world`.
///
/// Returns the number of saves updated.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn clear_protection_at(
    conn: &mut PgConnection,
    world: WorldId,
    at: Coordinates,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE outpost.save AS s
        SET protected = 0,
            protection_expires_at = NULL,
            updated_at = NOW()
        FROM outpost.world_map_cell AS c
        WHERE c.base_id = s.basesaveid
          AND c.world_id = $1
          AND c.x = $2
          AND c.y = $3
        ",
    )
    .bind(world)
    .bind(at.x)
    .bind(at.y)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
