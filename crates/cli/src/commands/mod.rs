//! CLI subcommand implementations.

pub mod migrate;
pub mod world;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use outpost_server::db::RepositoryError;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

/// Connect to the game database named by `OUTPOST_DATABASE_URL` (or `DATABASE_URL`).
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("OUTPOST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("OUTPOST_DATABASE_URL"))?;

    tracing::info!("Connecting to game database...");
    let pool = outpost_server::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
