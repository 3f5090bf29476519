//! Durable storage of preset slots between sessions.
//!
//! Covers:
//! - `StoredPresets` (versioned payload holding every slot)
//! - `PresetRepository` (the storage boundary trait)
//! - `FilePresetRepository` (YAML file with atomic replace)

use crate::error::PresetError;
use crate::slot::{SlotId, StoredSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Version written to the storage file; bump when the payload shape
/// changes.
pub const STORAGE_VERSION: u32 = 1;

fn default_version() -> u32 {
    STORAGE_VERSION
}

/// Everything the repository persists: the payload version plus each
/// slot's sparse state, keyed by 1-based slot number.
///
/// Slots still at defaults may be absent from the mapping; a restore
/// leaves absent slots untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPresets {
    /// Payload format version. Files written by hand may omit it, in which
    /// case the current version is assumed.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Slot states keyed by slot number.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<u8, StoredSlot>,
}

impl Default for StoredPresets {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            slots: BTreeMap::new(),
        }
    }
}

impl StoredPresets {
    /// Creates an empty payload at the current version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored state for one slot, if the file had any.
    pub fn slot(&self, id: SlotId) -> Option<&StoredSlot> {
        self.slots.get(&id.number())
    }

    /// Sets one slot's stored state.
    pub fn set_slot(&mut self, id: SlotId, state: StoredSlot) {
        self.slots.insert(id.number(), state);
    }
}

/// Storage boundary for preset slots.
///
/// Failures are non-fatal to the session: a failed `load` starts from
/// defaults, a failed `save` leaves in-memory state valid and is surfaced
/// to the user as a status message.
pub trait PresetRepository {
    /// Loads every stored slot, or `None` when nothing has been persisted
    /// yet.
    fn load(&mut self) -> Result<Option<StoredPresets>, PresetError>;

    /// Persists one slot's state.
    fn save(&mut self, id: SlotId, state: &StoredSlot) -> Result<(), PresetError>;
}

/// File-backed repository: one YAML document holding every slot.
///
/// Saves are atomic: the payload is written to a sibling `.tmp` file and
/// renamed over the target, so a crash mid-write never corrupts the
/// previous state.
#[derive(Debug)]
pub struct FilePresetRepository {
    path: PathBuf,
    cache: Option<StoredPresets>,
}

impl FilePresetRepository {
    /// Repository at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    /// Repository at the default per-user location.
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Get the default storage file path (using XDG convention)
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("loadout").join("presets.yaml")
            } else {
                PathBuf::from("presets.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // Use XDG convention on all platforms: ~/.config/loadout/presets.yaml
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("loadout").join("presets.yaml")
            } else {
                // Fallback if home directory cannot be determined
                PathBuf::from("presets.yaml")
            }
        }
    }

    /// The file this repository reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<StoredPresets>, PresetError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let stored: StoredPresets = serde_yaml_ng::from_str(&contents)?;
        if stored.version != STORAGE_VERSION {
            log::warn!(
                "unsupported preset storage version {} in {:?}, starting from defaults",
                stored.version,
                self.path
            );
            return Ok(None);
        }
        Ok(Some(stored))
    }

    fn write_file(&self, presets: &StoredPresets) -> Result<(), PresetError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(presets)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl PresetRepository for FilePresetRepository {
    fn load(&mut self) -> Result<Option<StoredPresets>, PresetError> {
        log::info!("Preset storage path: {:?}", self.path);
        let stored = self.read_file()?;
        match &stored {
            Some(stored) => log::info!("Loaded {} stored preset slot(s)", stored.slots.len()),
            None => log::info!("No stored presets found"),
        }
        self.cache = Some(stored.clone().unwrap_or_default());
        Ok(stored)
    }

    fn save(&mut self, id: SlotId, state: &StoredSlot) -> Result<(), PresetError> {
        let mut presets = match self.cache.take() {
            Some(cached) => cached,
            None => match self.read_file() {
                Ok(Some(stored)) => stored,
                Ok(None) => StoredPresets::new(),
                Err(e) => {
                    // The write below replaces the unreadable file wholesale.
                    log::warn!("rewriting unreadable preset storage: {e}");
                    StoredPresets::new()
                }
            },
        };
        presets.set_slot(id, state.clone());

        let result = self.write_file(&presets);
        self.cache = Some(presets);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_state(nickname: &str) -> StoredSlot {
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Hero".to_string());
        StoredSlot {
            nickname: nickname.to_string(),
            values,
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.yaml");

        let mut repo = FilePresetRepository::new(&path);
        repo.save(SlotId::One, &sample_state("Speedrun"))
            .expect("save slot 1");
        repo.save(SlotId::Three, &sample_state("Casual"))
            .expect("save slot 3");

        let mut fresh = FilePresetRepository::new(&path);
        let stored = fresh.load().expect("load").expect("file exists");

        assert_eq!(stored.version, STORAGE_VERSION);
        assert_eq!(
            stored.slot(SlotId::One).map(|s| s.nickname.as_str()),
            Some("Speedrun")
        );
        assert_eq!(
            stored.slot(SlotId::Three).map(|s| s.nickname.as_str()),
            Some("Casual")
        );
        assert!(stored.slot(SlotId::Two).is_none());
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut repo = FilePresetRepository::new(dir.path().join("nothing.yaml"));

        assert!(repo.load().expect("load").is_none());
    }

    #[test]
    fn test_save_overwrites_previous_slot_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.yaml");

        let mut repo = FilePresetRepository::new(&path);
        repo.save(SlotId::One, &sample_state("First")).expect("save");
        repo.save(SlotId::One, &sample_state("Second")).expect("save");

        let mut fresh = FilePresetRepository::new(&path);
        let stored = fresh.load().expect("load").expect("file exists");
        assert_eq!(
            stored.slot(SlotId::One).map(|s| s.nickname.as_str()),
            Some("Second")
        );
    }

    #[test]
    fn test_unsupported_version_treated_as_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.yaml");
        fs::write(&path, "version: 99\nslots:\n  1:\n    nickname: Old\n")
            .expect("write file");

        let mut repo = FilePresetRepository::new(&path);
        assert!(repo.load().expect("load").is_none());
    }

    #[test]
    fn test_missing_version_assumes_current() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.yaml");
        fs::write(&path, "slots:\n  2:\n    nickname: HandWritten\n").expect("write file");

        let mut repo = FilePresetRepository::new(&path);
        let stored = repo.load().expect("load").expect("file parses");
        assert_eq!(stored.version, STORAGE_VERSION);
        assert_eq!(
            stored.slot(SlotId::Two).map(|s| s.nickname.as_str()),
            Some("HandWritten")
        );
    }

    #[test]
    fn test_corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.yaml");
        fs::write(&path, "slots: [not a mapping").expect("write file");

        let mut repo = FilePresetRepository::new(&path);
        let err = repo.load().expect_err("corrupt file");
        assert!(matches!(err, PresetError::Yaml(_)));
    }

    #[test]
    fn test_save_replaces_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.yaml");
        fs::write(&path, "garbage: [").expect("write file");

        let mut repo = FilePresetRepository::new(&path);
        repo.save(SlotId::Two, &sample_state("Recovered"))
            .expect("save over corrupt file");

        let mut fresh = FilePresetRepository::new(&path);
        let stored = fresh.load().expect("load").expect("file exists");
        assert_eq!(
            stored.slot(SlotId::Two).map(|s| s.nickname.as_str()),
            Some("Recovered")
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("deeper").join("presets.yaml");

        let mut repo = FilePresetRepository::new(&path);
        repo.save(SlotId::One, &sample_state("Nested")).expect("save");

        assert!(path.exists());
    }
}
