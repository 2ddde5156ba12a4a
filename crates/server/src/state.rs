//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::game_data::GameData;
use crate::services::base::PgBaseStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    game_data: GameData,
    bases: PgBaseStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool, game_data: GameData) -> Self {
        let bases = PgBaseStore::new(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                game_data,
                bases,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Static game tables.
    #[must_use]
    pub fn game_data(&self) -> &GameData {
        &self.inner.game_data
    }

    /// Transaction source for base loads.
    #[must_use]
    pub fn base_store(&self) -> &PgBaseStore {
        &self.inner.bases
    }
}
