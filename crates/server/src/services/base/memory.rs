//! In-memory [`BaseStore`] for tests.
//!
//! A transaction works on a copy of the committed state and writes it back
//! on commit, so dropping a transaction discards its changes just like a
//! database rollback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::json;

use outpost_core::{CellId, Coordinates, SaveId, UserId, Username, WorldId};

use super::store::{BaseStore, BaseTx};
use crate::db::RepositoryError;
use crate::models::{NewSave, NewWorldMapCell, Save, User, WorldMapCell};

/// Committed contents of the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: HashMap<UserId, User>,
    pub saves: HashMap<SaveId, Save>,
    pub cells: Vec<WorldMapCell>,
    next_save: i64,
    next_cell: i32,
}

/// Operation that should fail with a database error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    UpdateSave,
    Commit,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_on: Option<FailOn>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, op: FailOn) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    pub fn add_user(&self, id: i32, name: &str) -> UserId {
        let id = UserId::new(id);
        let now = Utc::now();
        self.lock().users.insert(
            id,
            User {
                id,
                username: Username::parse(name).unwrap(),
                save_id: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    /// Store `save`, linking it to its owner when `active`.
    pub fn add_save(&self, save: Save, active: bool) -> SaveId {
        let mut state = self.lock();
        let id = save.basesaveid;
        state.next_save = state.next_save.max(id.as_i64());
        if active && let Some(user) = state.users.get_mut(&save.saveuserid) {
            user.save_id = Some(id);
        }
        state.saves.insert(id, save);
        id
    }

    pub fn add_cell(&self, world: WorldId, at: Coordinates, base: SaveId, uid: UserId) -> CellId {
        let mut state = self.lock();
        state.next_cell += 1;
        let cell_id = CellId::new(state.next_cell);
        state.cells.push(WorldMapCell {
            cell_id,
            world_id: world,
            x: at.x,
            y: at.y,
            base_id: base,
            uid,
            base_type: 0,
        });
        cell_id
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }
}

impl BaseStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, RepositoryError> {
        Ok(MemoryTx {
            working: self.snapshot(),
            committed: Arc::clone(&self.state),
            fail_on: self.fail_on,
        })
    }
}

pub struct MemoryTx {
    working: MemoryState,
    committed: Arc<Mutex<MemoryState>>,
    fail_on: Option<FailOn>,
}

impl MemoryTx {
    fn check(&self, op: FailOn) -> Result<(), RepositoryError> {
        if self.fail_on == Some(op) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl BaseTx for MemoryTx {
    async fn user(&mut self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn save(&mut self, id: SaveId) -> Result<Option<Save>, RepositoryError> {
        Ok(self.working.saves.get(&id).cloned())
    }

    async fn insert_save(&mut self, new: &NewSave) -> Result<Save, RepositoryError> {
        self.working.next_save += 1;
        let id = SaveId::new(self.working.next_save);
        let now = Utc::now();
        let save = Save {
            basesaveid: id,
            saveuserid: new.saveuserid,
            name: new.name.clone(),
            basename: new.basename.clone(),
            base_type: new.base_type.clone(),
            level: new.level,
            credits: new.credits,
            homebase: new.homebase.clone(),
            homebaseid: SaveId::new(0),
            worldid: None,
            cellid: CellId::new(0),
            attackid: 0,
            protected: new.protected,
            protection_expires_at: None,
            resources: new.resources.clone(),
            buildingdata: new.buildingdata.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.saves.insert(id, save.clone());
        Ok(save)
    }

    async fn link_user_save(&mut self, user: UserId, save: SaveId) -> Result<(), RepositoryError> {
        let user = self
            .working
            .users
            .get_mut(&user)
            .ok_or(RepositoryError::NotFound)?;
        user.save_id = Some(save);
        Ok(())
    }

    async fn cell_for_base(&mut self, base: SaveId) -> Result<Option<WorldMapCell>, RepositoryError> {
        Ok(self
            .working
            .cells
            .iter()
            .find(|cell| cell.base_id == base)
            .cloned())
    }

    async fn cell_at(
        &mut self,
        world: WorldId,
        at: Coordinates,
    ) -> Result<Option<WorldMapCell>, RepositoryError> {
        Ok(self
            .working
            .cells
            .iter()
            .find(|cell| cell.world_id == world && cell.coordinates() == at)
            .cloned())
    }

    async fn insert_cell(&mut self, new: &NewWorldMapCell) -> Result<WorldMapCell, RepositoryError> {
        let taken = self.working.cells.iter().any(|cell| {
            cell.base_id == new.base_id
                || (cell.world_id == new.world_id && cell.coordinates() == new.coordinates)
        });
        if taken {
            return Err(RepositoryError::Conflict(
                "world map cell already exists".to_owned(),
            ));
        }

        self.working.next_cell += 1;
        let cell = WorldMapCell {
            cell_id: CellId::new(self.working.next_cell),
            world_id: new.world_id,
            x: new.coordinates.x,
            y: new.coordinates.y,
            base_id: new.base_id,
            uid: new.uid,
            base_type: new.base_type,
        };
        self.working.cells.push(cell.clone());
        Ok(cell)
    }

    async fn clear_protection(
        &mut self,
        world: WorldId,
        at: Coordinates,
    ) -> Result<u64, RepositoryError> {
        let bases: Vec<SaveId> = self
            .working
            .cells
            .iter()
            .filter(|cell| cell.world_id == world && cell.coordinates() == at)
            .map(|cell| cell.base_id)
            .collect();

        let mut cleared = 0;
        for base in bases {
            if let Some(save) = self.working.saves.get_mut(&base) {
                save.clear_protection();
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn update_save(&mut self, save: &Save) -> Result<(), RepositoryError> {
        self.check(FailOn::UpdateSave)?;
        let slot = self
            .working
            .saves
            .get_mut(&save.basesaveid)
            .ok_or(RepositoryError::NotFound)?;
        *slot = save.clone();
        Ok(())
    }

    async fn commit(self) -> Result<(), RepositoryError> {
        self.check(FailOn::Commit)?;
        *self.committed.lock().unwrap() = self.working;
        Ok(())
    }
}

/// A placed, protected main base.
pub fn sample_save(id: SaveId, owner: UserId) -> Save {
    let now = Utc::now();
    Save {
        basesaveid: id,
        saveuserid: owner,
        name: "raider".to_owned(),
        basename: "Main Base".to_owned(),
        base_type: "main".to_owned(),
        level: 3,
        credits: 500,
        homebase: vec!["10".to_owned(), "20".to_owned()],
        homebaseid: id,
        worldid: None,
        cellid: CellId::new(0),
        attackid: 0,
        protected: 1,
        protection_expires_at: Some(now),
        resources: json!({"r1": 10}),
        buildingdata: json!({}),
        created_at: now,
        updated_at: now,
    }
}
