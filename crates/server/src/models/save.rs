//! Base save types.
//!
//! A `Save` is the persisted state of one base. Field names follow the
//! client protocol (`basesaveid`, `homebaseid`, ...) because the save is
//! serialized almost verbatim into the base load response.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use outpost_core::{CellId, Coordinates, CoordinatesError, SaveId, UserId, WorldId};

use super::frontend::FrontendKeys;
use super::user::User;

/// Credits granted to a brand-new base.
pub const DEFAULT_CREDITS: i32 = 2000;

/// Amount of each resource granted to a brand-new base.
pub const DEFAULT_RESOURCE_AMOUNT: i64 = 1000;

/// Base type of a player's home base.
pub const MAIN_BASE_TYPE: &str = "main";

/// A persisted base.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Save {
    pub basesaveid: SaveId,
    /// Owner of the base.
    pub saveuserid: UserId,
    /// Owner's display name, also the avatar seed.
    pub name: String,
    pub basename: String,
    #[serde(rename = "type")]
    pub base_type: String,
    pub level: i32,
    pub credits: i32,
    /// Serialized home-base coordinates, `["x", "y"]`.
    pub homebase: Vec<String>,
    /// Base id of the placed home base; `0` until placed on the world map.
    pub homebaseid: SaveId,
    pub worldid: Option<WorldId>,
    /// `0` until placed on the world map.
    pub cellid: CellId,
    pub attackid: i32,
    /// Damage protection flag (1 = protected).
    pub protected: i32,
    pub protection_expires_at: Option<DateTime<Utc>>,
    #[sqlx(json)]
    pub resources: Value,
    #[sqlx(json)]
    pub buildingdata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Save {
    /// Whether the base already has a home cell on the world map.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        !self.homebaseid.is_unset()
    }

    /// Parse the home-base pair into map coordinates.
    ///
    /// # Errors
    ///
    /// Returns `CoordinatesError` if `homebase` is not a two-element numeric pair.
    pub fn home_coordinates(&self) -> Result<Coordinates, CoordinatesError> {
        Coordinates::from_homebase(&self.homebase)
    }

    /// Drop damage protection.
    pub fn clear_protection(&mut self) {
        self.protected = 0;
        self.protection_expires_at = None;
    }
}

impl FrontendKeys for Save {
    const FRONTEND_KEYS: &'static [&'static str] = &[
        "basesaveid",
        "saveuserid",
        "name",
        "basename",
        "type",
        "level",
        "credits",
        "homebase",
        "homebaseid",
        "worldid",
        "cellid",
        "attackid",
        "protected",
        "resources",
        "buildingdata",
    ];
}

/// Attributes of a save that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSave {
    pub saveuserid: UserId,
    pub name: String,
    pub basename: String,
    pub base_type: String,
    pub level: i32,
    pub credits: i32,
    pub homebase: Vec<String>,
    pub protected: i32,
    pub resources: Value,
    pub buildingdata: Value,
}

impl NewSave {
    /// Default attributes for a player's first base.
    ///
    /// New bases start protected, unplaced (`homebaseid = 0`, no world) and
    /// with the starter credits and resources.
    #[must_use]
    pub fn default_for(user: &User) -> Self {
        Self {
            saveuserid: user.id,
            name: user.username.as_str().to_owned(),
            basename: "Main Base".to_owned(),
            base_type: MAIN_BASE_TYPE.to_owned(),
            level: 1,
            credits: DEFAULT_CREDITS,
            homebase: Vec::new(),
            protected: 1,
            resources: json!({
                "r1": DEFAULT_RESOURCE_AMOUNT,
                "r2": DEFAULT_RESOURCE_AMOUNT,
                "r3": DEFAULT_RESOURCE_AMOUNT,
                "r4": DEFAULT_RESOURCE_AMOUNT,
            }),
            buildingdata: json!({}),
        }
    }
}
