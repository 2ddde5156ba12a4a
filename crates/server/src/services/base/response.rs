//! Base load response body.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::config::DevSettings;
use crate::game_data::{GameData, avatar_url};
use crate::models::{FrontendFilterError, Save, filter_frontend_keys};

/// `tutorialstage` sent when the tutorial is skipped.
pub const TUTORIAL_SKIPPED_STAGE: i32 = 205;

/// Build the JSON object returned by a base load.
///
/// Static game data comes first, then the filtered save fields, then the
/// `id` alias and `tutorialstage`, so the save can never shadow either.
///
/// # Errors
///
/// Returns an error if the save cannot be serialized.
pub fn build_response(
    save: &Save,
    game: &GameData,
    dev: DevSettings,
    now: DateTime<Utc>,
) -> Result<Map<String, Value>, FrontendFilterError> {
    let mut body = Map::new();
    body.insert("flags".to_owned(), Value::Object(game.flags.clone()));
    body.insert("error".to_owned(), json!(0));
    body.insert("currenttime".to_owned(), json!(now.timestamp()));
    body.insert("pic_square".to_owned(), json!(avatar_url(&save.name)));
    body.insert(
        "storeitems".to_owned(),
        Value::Object(game.store_items.clone()),
    );

    body.extend(filter_frontend_keys(save)?);

    body.insert("id".to_owned(), json!(save.basesaveid));
    let stage = if dev.skip_tutorial {
        TUTORIAL_SKIPPED_STAGE
    } else {
        0
    };
    body.insert("tutorialstage".to_owned(), json!(stage));

    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::base::memory::sample_save;
    use outpost_core::{SaveId, UserId};

    fn game() -> GameData {
        GameData::builtin().unwrap()
    }

    #[test]
    fn includes_static_data_and_aliases() {
        let save = sample_save(SaveId::new(42), UserId::new(1));
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let body = build_response(&save, &game(), DevSettings::default(), now).unwrap();

        assert_eq!(body["error"], 0);
        assert_eq!(body["currenttime"], 1_700_000_000_i64);
        assert_eq!(body["id"], 42);
        assert_eq!(body["basesaveid"], 42);
        assert_eq!(body["tutorialstage"], 0);
        assert_eq!(body["type"], "main");
        assert!(body["flags"].is_object());
        assert!(body["storeitems"].is_object());
        assert!(
            body["pic_square"]
                .as_str()
                .unwrap()
                .ends_with(&format!("seed={}", save.name))
        );
    }

    #[test]
    fn strips_server_only_fields() {
        let save = sample_save(SaveId::new(1), UserId::new(1));
        let body = build_response(&save, &game(), DevSettings::default(), Utc::now()).unwrap();

        for key in ["created_at", "updated_at", "protection_expires_at", "base_type"] {
            assert!(!body.contains_key(key), "{key} leaked into the response");
        }
    }

    #[test]
    fn skip_tutorial_sets_stage() {
        let save = sample_save(SaveId::new(1), UserId::new(1));
        let dev = DevSettings {
            skip_tutorial: true,
        };
        let body = build_response(&save, &game(), dev, Utc::now()).unwrap();
        assert_eq!(body["tutorialstage"], TUTORIAL_SKIPPED_STAGE);
    }

    #[test]
    fn keys_are_ordered_for_the_client() {
        let save = sample_save(SaveId::new(1), UserId::new(1));
        let body = build_response(&save, &game(), DevSettings::default(), Utc::now()).unwrap();
        let keys: Vec<&str> = body.keys().map(String::as_str).collect();

        assert_eq!(&keys[..5], ["flags", "error", "currenttime", "pic_square", "storeitems"]);
        assert_eq!(&keys[keys.len() - 2..], ["id", "tutorialstage"]);
    }
}
