use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::store::schema::PreferencesData;

const PREFERENCES_FILE: &str = "preferences.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = data_dir();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Missing, unreadable, corrupt or outdated files all fall back to
    /// defaults; preferences are never worth failing startup over.
    pub fn load_preferences(&self) -> PreferencesData {
        let path = self.file_path(PREFERENCES_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return PreferencesData::default();
        };
        match serde_json::from_str::<PreferencesData>(&content) {
            Ok(prefs) if !prefs.needs_reset() => prefs,
            Ok(_) => {
                tracing::info!(path = %path.display(), "preferences schema changed, resetting");
                PreferencesData::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                PreferencesData::default()
            }
        }
    }

    pub fn save_preferences(&self, data: &PreferencesData) -> Result<()> {
        self.save(PREFERENCES_FILE, data)
    }
}

/// Per-user data directory, shared with the default log file location.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sqlspell")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LevelKey;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.load_preferences(), PreferencesData::default());
    }

    #[test]
    fn preferences_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let prefs = PreferencesData {
            fullscreen_level: Some(LevelKey::new(2, 3)),
            ..PreferencesData::default()
        };
        store.save_preferences(&prefs).unwrap();

        let loaded = store.load_preferences();
        assert!(loaded.restores_fullscreen_for(LevelKey::new(2, 3)));
        assert!(!loaded.restores_fullscreen_for(LevelKey::new(2, 4)));
        assert!(!dir.path().join("preferences.tmp").exists());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "{not json").unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.load_preferences(), PreferencesData::default());
    }

    #[test]
    fn outdated_schema_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PREFERENCES_FILE),
            r#"{"schema_version": 0, "fullscreen_level": {"module_id": 1, "level_id": 1}}"#,
        )
        .unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.load_preferences().fullscreen_level, None);
    }
}
