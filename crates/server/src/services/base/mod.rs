//! Base loading.
//!
//! Resolves the save a client asked for, creates a default save for players
//! who have none, and applies the attack-mode side effects: protection
//! removal, a fresh attack id and lazy placement of the target on the world
//! map. All of it runs in one [`BaseTx`] that is committed only after every
//! step succeeded.

mod error;
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod memory;
pub mod response;
pub mod store;

pub use error::BaseLoadError;
pub use response::build_response;
pub use store::{BaseStore, BaseTx, PgBaseStore};

use rand::Rng;

use outpost_core::{BaseMode, SaveId, UserId};

use crate::models::cell::ATTACKED_BASE_TYPE;
use crate::models::{NewSave, NewWorldMapCell, Save};

/// Smallest attack id (five decimal digits).
const ATTACK_ID_MIN: i32 = 10_000;
/// Largest attack id.
const ATTACK_ID_MAX: i32 = 99_999;

/// Which base a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRef {
    /// `baseid` `"0"`: the requesting player's own base.
    Own,
    Id(SaveId),
}

impl BaseRef {
    /// Parse the client's `baseid`.
    ///
    /// # Errors
    ///
    /// Returns `BaseLoadError::InvalidBaseId` unless `raw` is a non-negative
    /// integer.
    pub fn parse(raw: &str) -> Result<Self, BaseLoadError> {
        let id: i64 = raw
            .trim()
            .parse()
            .map_err(|_| BaseLoadError::InvalidBaseId(raw.to_owned()))?;

        match id {
            0 => Ok(Self::Own),
            id if id > 0 => Ok(Self::Id(SaveId::new(id))),
            _ => Err(BaseLoadError::InvalidBaseId(raw.to_owned())),
        }
    }
}

/// A validated base load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseLoadRequest {
    pub mode: BaseMode,
    pub base: BaseRef,
}

/// Result of a base load.
#[derive(Debug, Clone)]
pub struct LoadedBase {
    pub save: Save,
    /// Whether a default save was created by this request.
    pub created: bool,
}

/// Loads bases through a [`BaseStore`].
pub struct BaseLoader<'a, S> {
    store: &'a S,
}

impl<'a, S: BaseStore> BaseLoader<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load a base for `player`.
    ///
    /// # Errors
    ///
    /// Returns `BaseLoadError::NotOwner` for build mode on another player's base.
    /// Returns `BaseLoadError::SaveNotFound` if the base does not exist.
    /// Returns `BaseLoadError::NoWorld`, `BaseLoadError::InvalidHomebase` or
    /// `BaseLoadError::CellOccupied` if an attacked base cannot be placed on
    /// the world map.
    /// Returns `BaseLoadError::Repository` on storage failures; nothing is
    /// persisted in that case.
    pub async fn load(
        &self,
        player: UserId,
        request: BaseLoadRequest,
    ) -> Result<LoadedBase, BaseLoadError> {
        let mut tx = self.store.begin().await?;

        let user = tx.user(player).await?.ok_or(BaseLoadError::UnknownPlayer)?;

        let own_save = match user.save_id {
            Some(id) => tx.save(id).await?,
            None => None,
        };

        let found = match request.base {
            BaseRef::Own => own_save.clone(),
            BaseRef::Id(id) => tx.save(id).await?,
        };

        if request.mode == BaseMode::Build
            && let Some(save) = &found
            && save.saveuserid != user.id
        {
            tracing::warn!(
                user_id = %user.id,
                base_id = %save.basesaveid,
                owner = %save.saveuserid,
                "Build mode requested for another player's base"
            );
            return Err(BaseLoadError::NotOwner);
        }

        let (mut save, created) = match (found, request.base) {
            (Some(save), _) => (save, false),
            (None, BaseRef::Own) => {
                tracing::info!(user_id = %user.id, "Base not found, creating a new save");
                let save = tx.insert_save(&NewSave::default_for(&user)).await?;
                tx.link_user_save(user.id, save.basesaveid).await?;
                (save, true)
            }
            (None, BaseRef::Id(_)) => return Err(BaseLoadError::SaveNotFound),
        };

        if request.mode == BaseMode::Attack {
            apply_attack(&mut tx, own_save.as_ref(), &mut save).await?;
        }

        tx.commit().await?;

        Ok(LoadedBase { save, created })
    }
}

/// Attack-mode side effects on `target`, persisted through `tx`.
async fn apply_attack<T: BaseTx>(
    tx: &mut T,
    attacker: Option<&Save>,
    target: &mut Save,
) -> Result<(), BaseLoadError> {
    let attacker_world = attacker.and_then(|save| save.worldid);

    match (target.worldid.or(attacker_world), target.home_coordinates()) {
        (Some(world), Ok(at)) => {
            let cleared = tx.clear_protection(world, at).await?;
            tracing::debug!(%world, %at, cleared, "Removed base protection");
        }
        _ => tracing::debug!(
            base_id = %target.basesaveid,
            "Target not on a known map cell, clearing protection on the save only"
        ),
    }
    target.clear_protection();

    target.attackid = generate_attack_id();

    if !target.is_placed() {
        let cell = match tx.cell_for_base(target.basesaveid).await? {
            Some(cell) => cell,
            None => {
                let world_id = attacker_world.ok_or(BaseLoadError::NoWorld)?;
                let coordinates = target.home_coordinates()?;
                if let Some(occupied) = tx.cell_at(world_id, coordinates).await? {
                    tracing::warn!(
                        base_id = %target.basesaveid,
                        occupant = %occupied.base_id,
                        %coordinates,
                        "Home coordinates already taken on the world map"
                    );
                    return Err(BaseLoadError::CellOccupied {
                        at: coordinates,
                        occupant: occupied.base_id,
                    });
                }
                let cell = tx
                    .insert_cell(&NewWorldMapCell {
                        world_id,
                        coordinates,
                        base_id: target.basesaveid,
                        uid: target.saveuserid,
                        base_type: ATTACKED_BASE_TYPE,
                    })
                    .await?;
                tracing::info!(
                    cell_id = %cell.cell_id,
                    base_id = %target.basesaveid,
                    %coordinates,
                    "Created world map cell for attacked base"
                );
                cell
            }
        };

        target.homebaseid = target.basesaveid;
        target.cellid = cell.cell_id;
        target.worldid = Some(cell.world_id);
    }

    tx.update_save(target).await?;
    Ok(())
}

/// A random five-digit attack id.
#[must_use]
pub fn generate_attack_id() -> i32 {
    rand::rng().random_range(ATTACK_ID_MIN..=ATTACK_ID_MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::memory::{FailOn, MemoryStore, sample_save};
    use super::*;
    use outpost_core::{CellId, Coordinates, WorldId};

    fn request(mode: BaseMode, base: BaseRef) -> BaseLoadRequest {
        BaseLoadRequest { mode, base }
    }

    /// Attacker with a placed base in `world`, plus an unplaced tribe base
    /// at (3, 4) owned by another user.
    fn attack_fixture(world: WorldId) -> (MemoryStore, UserId, SaveId) {
        let store = MemoryStore::new();
        let attacker = store.add_user(1, "attacker");
        let tribe = store.add_user(2, "tribe");

        let mut own = sample_save(SaveId::new(1), attacker);
        own.worldid = Some(world);
        store.add_save(own, true);

        let mut target = sample_save(SaveId::new(2), tribe);
        target.homebaseid = SaveId::new(0);
        target.homebase = vec!["3".to_owned(), "4".to_owned()];
        store.add_save(target, false);

        (store, attacker, SaveId::new(2))
    }

    #[test]
    fn base_ref_parsing() {
        assert_eq!(BaseRef::parse("0").unwrap(), BaseRef::Own);
        assert_eq!(BaseRef::parse(" 17 ").unwrap(), BaseRef::Id(SaveId::new(17)));
        assert!(matches!(
            BaseRef::parse("abc"),
            Err(BaseLoadError::InvalidBaseId(_))
        ));
        assert!(matches!(
            BaseRef::parse("-3"),
            Err(BaseLoadError::InvalidBaseId(_))
        ));
        assert!(matches!(
            BaseRef::parse(""),
            Err(BaseLoadError::InvalidBaseId(_))
        ));
    }

    #[test]
    fn attack_ids_have_five_digits() {
        for _ in 0..1000 {
            let id = generate_attack_id();
            assert!((ATTACK_ID_MIN..=ATTACK_ID_MAX).contains(&id));
        }
    }

    #[tokio::test]
    async fn build_mode_rejects_foreign_base() {
        let store = MemoryStore::new();
        let me = store.add_user(1, "builder");
        let other = store.add_user(2, "neighbour");
        store.add_save(sample_save(SaveId::new(9), other), true);
        let before = store.snapshot();

        let err = BaseLoader::new(&store)
            .load(me, request(BaseMode::Build, BaseRef::Id(SaveId::new(9))))
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::NotOwner));
        let after = store.snapshot();
        assert_eq!(after.saves, before.saves);
        assert!(after.users[&me].save_id.is_none());
    }

    #[tokio::test]
    async fn build_mode_loads_own_base() {
        let store = MemoryStore::new();
        let me = store.add_user(1, "builder");
        store.add_save(sample_save(SaveId::new(5), me), true);

        let loaded = BaseLoader::new(&store)
            .load(me, request(BaseMode::Build, BaseRef::Id(SaveId::new(5))))
            .await
            .unwrap();

        assert_eq!(loaded.save.basesaveid, SaveId::new(5));
        assert!(!loaded.created);
    }

    #[tokio::test]
    async fn view_mode_ignores_owner() {
        let store = MemoryStore::new();
        let me = store.add_user(1, "visitor");
        let other = store.add_user(2, "host");
        store.add_save(sample_save(SaveId::new(9), other), true);
        let before = store.snapshot();

        let loaded = BaseLoader::new(&store)
            .load(me, request(BaseMode::View, BaseRef::Id(SaveId::new(9))))
            .await
            .unwrap();

        assert_eq!(loaded.save.saveuserid, other);
        assert_eq!(store.snapshot().saves, before.saves);
    }

    #[tokio::test]
    async fn own_base_resolves_linked_save() {
        let store = MemoryStore::new();
        let me = store.add_user(1, "builder");
        store.add_save(sample_save(SaveId::new(12), me), true);

        let loaded = BaseLoader::new(&store)
            .load(me, request(BaseMode::Build, BaseRef::Own))
            .await
            .unwrap();

        assert_eq!(loaded.save.basesaveid, SaveId::new(12));
        assert!(!loaded.created);
    }

    #[tokio::test]
    async fn missing_own_base_creates_default_save() {
        let store = MemoryStore::new();
        let me = store.add_user(1, "newbie");

        let loaded = BaseLoader::new(&store)
            .load(me, request(BaseMode::Build, BaseRef::Own))
            .await
            .unwrap();

        assert!(loaded.created);
        let save = &loaded.save;
        assert_eq!(save.saveuserid, me);
        assert_eq!(save.name, "newbie");
        assert!(!save.is_placed());
        assert_eq!(save.protected, 1);

        let state = store.snapshot();
        assert_eq!(state.users[&me].save_id, Some(save.basesaveid));
        assert!(state.saves.contains_key(&save.basesaveid));
    }

    #[tokio::test]
    async fn missing_base_by_id_is_not_found() {
        let store = MemoryStore::new();
        let me = store.add_user(1, "visitor");

        let err = BaseLoader::new(&store)
            .load(me, request(BaseMode::View, BaseRef::Id(SaveId::new(404))))
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::SaveNotFound));
        assert!(store.snapshot().saves.is_empty());
    }

    #[tokio::test]
    async fn unknown_player_is_rejected() {
        let store = MemoryStore::new();

        let err = BaseLoader::new(&store)
            .load(UserId::new(99), request(BaseMode::View, BaseRef::Own))
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::UnknownPlayer));
    }

    #[tokio::test]
    async fn attack_places_unplaced_base() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);

        let loaded = BaseLoader::new(&store)
            .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.cells.len(), 1);
        let cell = &state.cells[0];
        assert_eq!(cell.coordinates(), Coordinates::new(3, 4));
        assert_eq!(cell.world_id, world);
        assert_eq!(cell.base_id, target);
        assert_eq!(cell.uid, UserId::new(2));
        assert_eq!(cell.base_type, ATTACKED_BASE_TYPE);

        let save = &state.saves[&target];
        assert_eq!(save.homebaseid, target);
        assert_eq!(save.cellid, cell.cell_id);
        assert_eq!(save.worldid, Some(world));
        assert_eq!(save, &loaded.save);
    }

    #[tokio::test]
    async fn attack_sets_attack_id_and_clears_protection() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);

        let loaded = BaseLoader::new(&store)
            .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
            .await
            .unwrap();

        assert!((ATTACK_ID_MIN..=ATTACK_ID_MAX).contains(&loaded.save.attackid));
        assert_eq!(loaded.save.protected, 0);
        assert!(loaded.save.protection_expires_at.is_none());

        let stored = &store.snapshot().saves[&target];
        assert_eq!(stored.attackid, loaded.save.attackid);
        assert_eq!(stored.protected, 0);
    }

    #[tokio::test]
    async fn attack_reuses_existing_cell() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);
        let cell_id = store.add_cell(world, Coordinates::new(3, 4), target, UserId::new(2));

        let loaded = BaseLoader::new(&store)
            .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
            .await
            .unwrap();

        assert_eq!(store.snapshot().cells.len(), 1);
        assert_eq!(loaded.save.cellid, cell_id);
        assert_eq!(loaded.save.homebaseid, target);
    }

    #[tokio::test]
    async fn attack_on_placed_base_clears_protection_at_its_cell() {
        let world = WorldId::generate();
        let store = MemoryStore::new();
        let attacker = store.add_user(1, "attacker");
        let victim = store.add_user(2, "victim");

        let mut own = sample_save(SaveId::new(1), attacker);
        own.worldid = Some(world);
        store.add_save(own, true);

        let mut target = sample_save(SaveId::new(2), victim);
        target.worldid = Some(world);
        target.cellid = CellId::new(1);
        store.add_save(target, true);
        store.add_cell(world, Coordinates::new(10, 20), SaveId::new(2), victim);

        let loaded = BaseLoader::new(&store)
            .load(
                attacker,
                request(BaseMode::Attack, BaseRef::Id(SaveId::new(2))),
            )
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.cells.len(), 1);
        assert_eq!(state.saves[&SaveId::new(2)].protected, 0);
        assert_eq!(loaded.save.homebaseid, SaveId::new(2));
        // The attacker's own base is untouched.
        assert_eq!(state.saves[&SaveId::new(1)].protected, 1);
    }

    #[tokio::test]
    async fn attack_without_world_fails_cleanly() {
        let store = MemoryStore::new();
        let attacker = store.add_user(1, "attacker");
        let tribe = store.add_user(2, "tribe");
        let mut target = sample_save(SaveId::new(2), tribe);
        target.homebaseid = SaveId::new(0);
        store.add_save(target, false);
        let before = store.snapshot();

        let err = BaseLoader::new(&store)
            .load(
                attacker,
                request(BaseMode::Attack, BaseRef::Id(SaveId::new(2))),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::NoWorld));
        let after = store.snapshot();
        assert!(after.cells.is_empty());
        assert_eq!(after.saves, before.saves);
    }

    #[tokio::test]
    async fn attack_with_bad_homebase_fails() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);
        {
            let mut save = store.snapshot().saves[&target].clone();
            save.homebase = vec!["north".to_owned()];
            store.add_save(save, false);
        }

        let err = BaseLoader::new(&store)
            .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::InvalidHomebase(_)));
        assert!(store.snapshot().cells.is_empty());
    }

    #[tokio::test]
    async fn attack_on_occupied_coordinates_is_a_placement_error() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);
        // The attacker's own base already holds (3, 4).
        store.add_cell(world, Coordinates::new(3, 4), SaveId::new(1), attacker);
        let before = store.snapshot();

        for _ in 0..2 {
            let err = BaseLoader::new(&store)
                .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                BaseLoadError::CellOccupied { at, occupant }
                    if at == Coordinates::new(3, 4) && occupant == SaveId::new(1)
            ));
        }

        let after = store.snapshot();
        assert_eq!(after.cells, before.cells);
        assert_eq!(after.saves, before.saves);
    }

    #[tokio::test]
    async fn attack_places_base_next_to_other_cells() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);
        store.add_cell(world, Coordinates::new(3, 5), SaveId::new(1), attacker);
        // Same coordinates in another world don't count.
        store.add_cell(WorldId::generate(), Coordinates::new(3, 4), SaveId::new(7), attacker);

        let loaded = BaseLoader::new(&store)
            .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
            .await
            .unwrap();

        assert_eq!(loaded.save.worldid, Some(world));
        assert_eq!(store.snapshot().cells.len(), 3);
    }

    #[tokio::test]
    async fn failed_attack_leaves_no_partial_changes() {
        let world = WorldId::generate();
        let (store, attacker, target) = attack_fixture(world);
        let store = store.failing(FailOn::UpdateSave);
        let before = store.snapshot();

        let err = BaseLoader::new(&store)
            .load(attacker, request(BaseMode::Attack, BaseRef::Id(target)))
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::Repository(_)));
        let after = store.snapshot();
        assert!(after.cells.is_empty());
        assert_eq!(after.saves, before.saves);
    }

    #[tokio::test]
    async fn failed_commit_discards_default_save() {
        let store = MemoryStore::new().failing(FailOn::Commit);
        let me = store.add_user(1, "newbie");

        let err = BaseLoader::new(&store)
            .load(me, request(BaseMode::View, BaseRef::Own))
            .await
            .unwrap_err();

        assert!(matches!(err, BaseLoadError::Repository(_)));
        let state = store.snapshot();
        assert!(state.saves.is_empty());
        assert!(state.users[&me].save_id.is_none());
    }
}
