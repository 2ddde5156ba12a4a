//! Base load modes.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// How a client is opening a base.
///
/// Only `build` and `attack` change server behaviour: building requires
/// ownership, attacking stamps the target with an attack id and places it on
/// the world map. Every other mode string the client sends (`view`, `help`,
/// replay modes, ...) is a read-only view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseMode {
    /// Owner is editing their base.
    Build,
    /// Read-only view of any base.
    #[default]
    View,
    /// Player is launching an attack against the base.
    Attack,
}

impl BaseMode {
    /// Map a client mode string to a `BaseMode`.
    ///
    /// Matching is case-insensitive. Unknown modes fall back to [`BaseMode::View`].
    #[must_use]
    pub fn from_request_type(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Self::Build,
            "attack" => Self::Attack,
            _ => Self::View,
        }
    }

    /// Wire name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::View => "view",
            Self::Attack => "attack",
        }
    }
}

impl fmt::Display for BaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_request_type(&raw))
    }
}
