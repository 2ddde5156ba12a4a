//! World administration queries.

use sqlx::PgPool;

use outpost_core::WorldId;

use super::RepositoryError;
use crate::models::World;

/// Create a world.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a world with this name exists.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn create(pool: &PgPool, name: &str) -> Result<World, RepositoryError> {
    let world = sqlx::query_as::<_, World>(
        r"
        INSERT INTO outpost.world (id, name)
        VALUES ($1, $2)
        RETURNING id, name, created_at
        ",
    )
    .bind(WorldId::generate())
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "world"))?;

    Ok(world)
}

/// List all worlds, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<World>, RepositoryError> {
    let worlds = sqlx::query_as::<_, World>(
        "SELECT id, name, created_at FROM outpost.world ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(worlds)
}
