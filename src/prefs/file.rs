//! JSON file backed preference store.
//!
//! The whole store is one flat JSON object. Writes go to a sibling temp
//! file that is then renamed over the original.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::error::PreferenceError;
use super::PreferenceStore;

/// Environment variable overriding the preference file path.
pub const PREFS_ENV: &str = "POMOTIP_PREFS";

const APP_DIR: &str = "pomotip";
const FILE_NAME: &str = "preferences.json";

/// Returns `<config_dir>/pomotip/preferences.json`.
///
/// # Errors
///
/// Returns `PreferenceError::NoConfigDir` if the platform has no config dir.
pub fn default_preferences_path() -> Result<PathBuf, PreferenceError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or(PreferenceError::NoConfigDir)
}

/// Picks the preference file: explicit path, then `POMOTIP_PREFS`, then the
/// platform default.
pub fn resolve_preferences_path(explicit: Option<PathBuf>) -> Result<PathBuf, PreferenceError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match std::env::var_os(PREFS_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => default_preferences_path(),
    }
}

/// Preference store persisted as a JSON object on disk.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::load(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("Starting with empty preferences: {}", e);
                BTreeMap::new()
            }
        };
        debug!("Loaded {} preference(s) from {}", values.len(), path.display());
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, PreferenceError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(PreferenceError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| PreferenceError::Format(e.to_string()))
    }

    fn values(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        let io_error = |e: std::io::Error| PreferenceError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let json = serde_json::to_string_pretty(values)
            .map_err(|e| PreferenceError::Format(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_error)?;
        fs::rename(&tmp, &self.path).map_err(io_error)?;

        debug!("Preferences written to {}", self.path.display());
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let mut values = self.values();
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut updated = values.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }
}
