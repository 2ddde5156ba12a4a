//! World management commands.
//!
//! ```bash
//! outpost-cli world create --name "Season 1"
//! outpost-cli world list
//! ```

use outpost_server::db::worlds;

use super::{CommandError, connect};

/// Create a world and print its id.
///
/// # Errors
///
/// Returns an error if the name is taken or the database is unreachable.
pub async fn create(name: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let world = worlds::create(&pool, name).await?;
    tracing::info!(world_id = %world.id, name = %world.name, "World created");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", world.id);
    }
    Ok(())
}

/// Print every world, oldest first.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;

    let worlds = worlds::list(&pool).await?;
    if worlds.is_empty() {
        tracing::info!("No worlds yet. Create one with: outpost-cli world create --name <name>");
    }

    #[allow(clippy::print_stdout)]
    {
        for world in worlds {
            println!(
                "{}\t{}\t{}",
                world.id,
                world.name,
                world.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}
