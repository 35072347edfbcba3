//! JSON persistence for the bed rule toggles.

use std::path::{Path, PathBuf};

use harderbeds_game::Settings;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings document on disk plus the in-memory copy every check reads.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from `path`, creating the file with defaults when it is
    /// missing. Unreadable or malformed documents fall back to defaults and
    /// are rewritten.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut store = Self {
            settings: Settings::default(),
            path,
        };

        match read(&store.path) {
            Ok(Some(settings)) => {
                store.settings = settings;
                return store;
            }
            Ok(None) => info!("Creating default settings at {}", store.path.display()),
            Err(e) => warn!(
                "Failed to load settings from {}, using defaults: {e}",
                store.path.display()
            ),
        }

        store.save().ok();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Mutate the in-memory settings. Call [`SettingsStore::save`] to persist.
    pub fn update(&mut self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings);
    }

    /// Write the settings as pretty-printed JSON. The previous file is kept as
    /// `<name>.backup` and the new one is written through a temporary file.
    /// Failures are logged and leave the in-memory settings untouched.
    pub fn save(&self) -> Result<(), SettingsError> {
        let result = self.write();
        if let Err(e) = &result {
            error!("Failed to save settings to {}: {e}", self.path.display());
        }
        result
    }

    fn write(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if self.path.exists() {
            std::fs::copy(&self.path, sibling(&self.path, "backup")).ok();
        }

        let json = serde_json::to_string_pretty(&self.settings)?;
        let tmp = sibling(&self.path, "tmp");
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            std::fs::remove_file(&tmp).ok();
            return Err(e.into());
        }
        Ok(())
    }
}

/// `Ok(None)` when there is no document yet.
fn read(path: &Path) -> Result<Option<Settings>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&contents)?))
}

/// `settings.json` -> `settings.json.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("harderbeds_settings_{}", rand::random::<u64>()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = temp_dir();
        let path = dir.join("nested").join("settings.json");

        let store = SettingsStore::load_or_create(&path);
        assert_eq!(store.settings(), Settings::default());
        assert!(path.exists());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["simulateMobPathingOnSleep"], true);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = temp_dir();
        let path = dir.join("settings.json");

        let mut store = SettingsStore::load_or_create(&path);
        store.update(|s| {
            s.visualize_mob_path = false;
            s.disable_phantom_spawning = false;
        });
        store.save().unwrap();

        let loaded = SettingsStore::load_or_create(&path);
        assert_eq!(loaded.settings(), store.settings());
        assert!(!loaded.settings().visualize_mob_path);
        assert!(loaded.settings().simulate_mob_pathing_on_sleep);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn update_is_not_persisted_until_save() {
        let dir = temp_dir();
        let path = dir.join("settings.json");

        let mut store = SettingsStore::load_or_create(&path);
        store.update(|s| s.enable_village_bed_penalty = false);
        assert!(!store.settings().enable_village_bed_penalty);

        let reloaded = SettingsStore::load_or_create(&path);
        assert!(reloaded.settings().enable_village_bed_penalty);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = temp_dir();
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::load_or_create(&path);
        assert_eq!(store.settings(), Settings::default());

        // The malformed document was replaced.
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Settings = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, Settings::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let dir = temp_dir();
        let path = dir.join("settings.json");
        std::fs::write(&path, "").unwrap();

        let store = SettingsStore::load_or_create(&path);
        assert_eq!(store.settings(), Settings::default());
        assert!(!std::fs::read_to_string(&path).unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn partial_document_keeps_defaults_for_missing_keys() {
        let dir = temp_dir();
        let path = dir.join("settings.json");
        std::fs::write(&path, r#"{"preventBedDropInVillages": false}"#).unwrap();

        let store = SettingsStore::load_or_create(&path);
        assert!(!store.settings().prevent_bed_drop_in_villages);
        assert!(store.settings().enable_village_bed_penalty);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn backup_created_on_second_save() {
        let dir = temp_dir();
        let path = dir.join("settings.json");

        let store = SettingsStore::load_or_create(&path);
        store.save().unwrap();

        assert!(dir.join("settings.json.backup").exists());
        assert!(!dir.join("settings.json.tmp").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn failed_save_reports_error_and_cleans_up() {
        let dir = temp_dir();
        let path = dir.join("settings.json");
        // A directory where the document should be: the final rename fails.
        std::fs::create_dir_all(&path).unwrap();

        let mut store = SettingsStore::load_or_create(&path);
        store.update(|s| s.visualize_mob_path = false);
        let before = store.settings();

        assert!(matches!(store.save(), Err(SettingsError::Io(_))));
        assert_eq!(store.settings(), before);
        assert!(!dir.join("settings.json.tmp").exists());
        assert!(path.is_dir());

        std::fs::remove_dir_all(&dir).ok();
    }
}
