use serde::{Deserialize, Serialize};

use crate::api::LevelKey;

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesData {
    pub schema_version: u32,
    /// Level that should open in fullscreen, recorded when the user
    /// navigated away from a fullscreen editor.
    #[serde(default)]
    pub fullscreen_level: Option<LevelKey>,
}

impl Default for PreferencesData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            fullscreen_level: None,
        }
    }
}

impl PreferencesData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn restores_fullscreen_for(&self, key: LevelKey) -> bool {
        self.fullscreen_level == Some(key)
    }
}
