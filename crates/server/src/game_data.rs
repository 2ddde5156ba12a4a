//! Static game data served with every base load.
//!
//! The tables are compiled into the binary from `crates/server/data/` and may
//! be replaced at startup by files in `OUTPOST_GAME_DATA_DIR`. They are read
//! only once loaded and shared through `AppState`.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

const BUILTIN_FLAGS: &str = include_str!("../data/flags.json");
const BUILTIN_STORE_ITEMS: &str = include_str!("../data/store_items.json");

const FLAGS_FILE: &str = "flags.json";
const STORE_ITEMS_FILE: &str = "store_items.json";

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/adventurer/png?backgroundType=solid&backgroundColor=b6e3f4,c0aede,d1d4f9&seed=";

/// Errors loading game data.
#[derive(Debug, Error)]
pub enum GameDataError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain a JSON object")]
    NotAnObject(String),
}

/// Client feature flags and store catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameData {
    pub flags: Map<String, Value>,
    pub store_items: Map<String, Value>,
}

impl GameData {
    /// The tables compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn builtin() -> Result<Self, GameDataError> {
        Ok(Self {
            flags: parse_object(FLAGS_FILE, BUILTIN_FLAGS)?,
            store_items: parse_object(STORE_ITEMS_FILE, BUILTIN_STORE_ITEMS)?,
        })
    }

    /// Load game data, overriding the built-in tables with any files found
    /// in `dir`.
    ///
    /// Missing files fall back to the built-in table; unreadable or
    /// malformed files are an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file exists but cannot be read or
    /// parsed.
    pub fn load(dir: Option<&Path>) -> Result<Self, GameDataError> {
        let mut data = Self::builtin()?;

        let Some(dir) = dir else {
            return Ok(data);
        };

        if let Some(flags) = read_override(dir, FLAGS_FILE)? {
            data.flags = flags;
        }
        if let Some(items) = read_override(dir, STORE_ITEMS_FILE)? {
            data.store_items = items;
        }

        tracing::info!(
            dir = %dir.display(),
            flags = data.flags.len(),
            store_items = data.store_items.len(),
            "Loaded game data"
        );

        Ok(data)
    }
}

/// Avatar image URL seeded by a player's name.
#[must_use]
pub fn avatar_url(seed: &str) -> String {
    format!("{AVATAR_BASE_URL}{}", urlencoding::encode(seed))
}

fn read_override(dir: &Path, file: &str) -> Result<Option<Map<String, Value>>, GameDataError> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No override, using built-in table");
        return Ok(None);
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| GameDataError::Io {
        file: path.display().to_string(),
        source,
    })?;

    parse_object(&path.display().to_string(), &raw).map(Some)
}

fn parse_object(file: &str, raw: &str) -> Result<Map<String, Value>, GameDataError> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GameDataError::NotAnObject(file.to_owned())),
        Err(source) => Err(GameDataError::Parse {
            file: file.to_owned(),
            source,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "outpost-game-data-{name}-{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn builtin_tables_parse() {
        let data = GameData::builtin().unwrap();
        assert!(!data.flags.is_empty());
        assert!(!data.store_items.is_empty());
    }

    #[test]
    fn load_without_dir_is_builtin() {
        assert_eq!(GameData::load(None).unwrap(), GameData::builtin().unwrap());
    }

    #[test]
    fn override_replaces_only_present_files() {
        let dir = scratch_dir("override");
        std::fs::write(dir.join(FLAGS_FILE), r#"{"maproom_enabled": 0}"#).unwrap();

        let data = GameData::load(Some(&dir)).unwrap();
        assert_eq!(data.flags.len(), 1);
        assert_eq!(data.flags["maproom_enabled"], 0);
        assert_eq!(data.store_items, GameData::builtin().unwrap().store_items);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn override_must_be_object() {
        let dir = scratch_dir("array");
        std::fs::write(dir.join(STORE_ITEMS_FILE), "[1, 2]").unwrap();

        let err = GameData::load(Some(&dir)).unwrap_err();
        assert!(matches!(err, GameDataError::NotAnObject(_)));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn avatar_seed_is_url_encoded() {
        let url = avatar_url("Big Boss&co");
        assert!(url.starts_with("https://api.dicebear.com/7.x/adventurer/png?"));
        assert!(url.ends_with("&seed=Big%20Boss%26co"));
    }
}
