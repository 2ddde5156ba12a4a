//! Unit of work for base loads.
//!
//! Every read and write of one base load goes through a [`BaseTx`]. Nothing
//! is visible to other requests until [`BaseTx::commit`] succeeds; dropping
//! the transaction rolls it back.

use std::future::Future;

use sqlx::{PgPool, Postgres, Transaction};

use outpost_core::{Coordinates, SaveId, UserId, WorldId};

use crate::db::{RepositoryError, cells, saves, users};
use crate::models::{NewSave, NewWorldMapCell, Save, User, WorldMapCell};

/// Source of base-load transactions.
pub trait BaseStore: Send + Sync {
    type Tx: BaseTx;

    /// Open a transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, RepositoryError>> + Send;
}

/// Operations available inside one base-load transaction.
pub trait BaseTx: Send {
    /// Fetch the player and hold their row for the rest of the transaction.
    fn user(
        &mut self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn save(
        &mut self,
        id: SaveId,
    ) -> impl Future<Output = Result<Option<Save>, RepositoryError>> + Send;

    fn insert_save(
        &mut self,
        save: &NewSave,
    ) -> impl Future<Output = Result<Save, RepositoryError>> + Send;

    /// Make `save` the user's active save.
    fn link_user_save(
        &mut self,
        user: UserId,
        save: SaveId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn cell_for_base(
        &mut self,
        base: SaveId,
    ) -> impl Future<Output = Result<Option<WorldMapCell>, RepositoryError>> + Send;

    /// The cell at `at` in `world`, whichever base holds it.
    fn cell_at(
        &mut self,
        world: WorldId,
        at: Coordinates,
    ) -> impl Future<Output = Result<Option<WorldMapCell>, RepositoryError>> + Send;

    fn insert_cell(
        &mut self,
        cell: &NewWorldMapCell,
    ) -> impl Future<Output = Result<WorldMapCell, RepositoryError>> + Send;

    /// Drop protection from every base placed at `at` in `world`.
    fn clear_protection(
        &mut self,
        world: WorldId,
        at: Coordinates,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    fn update_save(
        &mut self,
        save: &Save,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// `PostgreSQL` implementation of [`BaseStore`].
#[derive(Clone)]
pub struct PgBaseStore {
    pool: PgPool,
}

impl PgBaseStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BaseStore for PgBaseStore {
    type Tx = PgBaseTx;

    async fn begin(&self) -> Result<PgBaseTx, RepositoryError> {
        Ok(PgBaseTx {
            tx: self.pool.begin().await?,
        })
    }
}

/// An open `PostgreSQL` transaction.
pub struct PgBaseTx {
    tx: Transaction<'static, Postgres>,
}

impl BaseTx for PgBaseTx {
    async fn user(&mut self, id: UserId) -> Result<Option<User>, RepositoryError> {
        users::lock_by_id(&mut self.tx, id).await
    }

    async fn save(&mut self, id: SaveId) -> Result<Option<Save>, RepositoryError> {
        saves::find_by_id(&mut self.tx, id).await
    }

    async fn insert_save(&mut self, save: &NewSave) -> Result<Save, RepositoryError> {
        saves::insert(&mut self.tx, save).await
    }

    async fn link_user_save(&mut self, user: UserId, save: SaveId) -> Result<(), RepositoryError> {
        users::link_save(&mut self.tx, user, save).await
    }

    async fn cell_for_base(&mut self, base: SaveId) -> Result<Option<WorldMapCell>, RepositoryError> {
        cells::find_by_base(&mut self.tx, base).await
    }

    async fn cell_at(
        &mut self,
        world: WorldId,
        at: Coordinates,
    ) -> Result<Option<WorldMapCell>, RepositoryError> {
        cells::find_at(&mut self.tx, world, at).await
    }

    async fn insert_cell(&mut self, cell: &NewWorldMapCell) -> Result<WorldMapCell, RepositoryError> {
        cells::insert(&mut self.tx, cell).await
    }

    async fn clear_protection(
        &mut self,
        world: WorldId,
        at: Coordinates,
    ) -> Result<u64, RepositoryError> {
        saves::clear_protection_at(&mut self.tx, world, at).await
    }

    async fn update_save(&mut self, save: &Save) -> Result<(), RepositoryError> {
        saves::update(&mut self.tx, save).await
    }

    async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}
