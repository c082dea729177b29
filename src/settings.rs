use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{log_warn, records::TimeWindow};

const ENABLE_LOGS: bool = true;

pub const DATA_DIR_ENV_VAR: &str = "CARELOG_DATA_DIR";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    /// Owner used when neither `--owner` nor the environment names one.
    pub owner_id: Option<String>,
    pub default_window: TimeWindow,
    pub refetch_after_write: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            owner_id: None,
            default_window: TimeWindow::Today,
            refetch_after_write: false,
        }
    }
}

/// `$CARELOG_DATA_DIR`, else the platform data dir, else `./.carelog`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DATA_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("carelog"))
        .unwrap_or_else(|| PathBuf::from(".carelog"))
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::new(dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn owner_id(&self) -> Option<String> {
        self.read().owner_id.clone()
    }

    pub fn set_owner(&self, owner_id: Option<String>) -> Result<()> {
        self.update(|settings| settings.owner_id = owner_id)
    }

    pub fn set_default_window(&self, window: TimeWindow) -> Result<()> {
        self.update(|settings| settings.default_window = window)
    }

    pub fn set_refetch_after_write(&self, enabled: bool) -> Result<()> {
        self.update(|settings| settings.refetch_after_write = enabled)
    }

    fn update(&self, change: impl FnOnce(&mut UserSettings)) -> Result<()> {
        let mut guard = self.write();
        change(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    // A panic while holding the lock cannot leave the settings half-written,
    // so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
