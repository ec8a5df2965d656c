//! Key-value preference storage.
//!
//! Preferences are plain strings under a handful of well-known keys. A
//! missing value is always legal and means "unset"; a value that fails to
//! parse is logged and treated the same way.

mod error;
mod file;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::types::{validate_duration, Phase, SessionConfig, Theme};

pub use error::PreferenceError;
pub use file::{default_preferences_path, resolve_preferences_path, JsonFilePreferenceStore, PREFS_ENV};

/// Key holding the tip service API key.
pub const API_KEY_PREF: &str = "tip_api_key";

/// Key holding the selected theme.
pub const THEME_PREF: &str = "theme";

/// Key holding the configured work duration in seconds.
pub const WORK_SECONDS_PREF: &str = "work_seconds";

/// Key holding the configured break duration in seconds.
pub const BREAK_SECONDS_PREF: &str = "break_seconds";

/// A string key-value store.
pub trait PreferenceStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PreferenceError>;
}

/// In-memory store, used by tests and as a fallback when no file is usable.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `pairs`.
    #[must_use]
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl MemoryPreferenceStore {
    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        self.values().remove(key);
        Ok(())
    }
}

// ============================================================================
// Typed helpers
// ============================================================================

/// Reads `key`, logging and swallowing store errors.
pub fn read_pref(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read preference '{}': {}", key, e);
            None
        }
    }
}

/// Returns the stored theme, or the default when unset or unknown.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    match read_pref(store, THEME_PREF) {
        Some(value) => value.parse().unwrap_or_else(|e| {
            warn!("Ignoring stored theme: {}", e);
            Theme::default()
        }),
        None => Theme::default(),
    }
}

/// Persists the selected theme.
pub fn save_theme(store: &dyn PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    store.set(THEME_PREF, theme.as_str())
}

fn duration_key(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => WORK_SECONDS_PREF,
        Phase::Break => BREAK_SECONDS_PREF,
    }
}

fn load_duration(store: &dyn PreferenceStore, phase: Phase) -> Option<u32> {
    let key = duration_key(phase);
    let raw = read_pref(store, key)?;
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| e.to_string())
        .and_then(|seconds| validate_duration(phase, seconds).map(|()| seconds));
    match parsed {
        Ok(seconds) => Some(seconds),
        Err(message) => {
            let err = PreferenceError::InvalidValue {
                key: key.to_string(),
                message,
            };
            warn!("Ignoring stored duration: {}", err);
            None
        }
    }
}

/// Returns the configured durations, falling back to defaults per phase.
pub fn load_session_config(store: &dyn PreferenceStore) -> SessionConfig {
    let defaults = SessionConfig::default();
    SessionConfig {
        work_seconds: load_duration(store, Phase::Work).unwrap_or(defaults.work_seconds),
        break_seconds: load_duration(store, Phase::Break).unwrap_or(defaults.break_seconds),
    }
}

/// Persists the configured duration of one phase.
pub fn save_duration(
    store: &dyn PreferenceStore,
    phase: Phase,
    seconds: u32,
) -> Result<(), PreferenceError> {
    store.set(duration_key(phase), &seconds.to_string())
}

/// Returns the stored API key, if any.
pub fn load_api_key(store: &dyn PreferenceStore) -> Result<Option<String>, PreferenceError> {
    store.get(API_KEY_PREF)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod memory_store_tests {
        use super::*;

        #[test]
        fn test_get_missing() {
            let store = MemoryPreferenceStore::new();
            assert_eq!(store.get("nothing").unwrap(), None);
        }

        #[test]
        fn test_set_get_remove() {
            let store = MemoryPreferenceStore::new();
            store.set(THEME_PREF, "dark").unwrap();
            assert_eq!(store.get(THEME_PREF).unwrap().as_deref(), Some("dark"));

            store.remove(THEME_PREF).unwrap();
            assert_eq!(store.get(THEME_PREF).unwrap(), None);

            // Removing twice is fine
            store.remove(THEME_PREF).unwrap();
        }

        #[test]
        fn test_poisoned_lock_is_recovered() {
            let store = std::sync::Arc::new(MemoryPreferenceStore::with_values([(
                THEME_PREF, "dark",
            )]));
            let holder = std::sync::Arc::clone(&store);
            let panicked = std::thread::spawn(move || {
                let _guard = holder.values();
                panic!("panic while holding the preference lock");
            })
            .join();
            assert!(panicked.is_err());

            assert_eq!(store.get(THEME_PREF).unwrap().as_deref(), Some("dark"));
            store.set(THEME_PREF, "retro").unwrap();
            assert_eq!(store.get(THEME_PREF).unwrap().as_deref(), Some("retro"));
        }
    }

    mod typed_helper_tests {
        use super::*;

        #[test]
        fn test_load_theme_default_when_unset() {
            let store = MemoryPreferenceStore::new();
            assert_eq!(load_theme(&store), Theme::Light);
        }

        #[test]
        fn test_load_theme_ignores_unknown() {
            let store = MemoryPreferenceStore::with_values([(THEME_PREF, "neon")]);
            assert_eq!(load_theme(&store), Theme::Light);
        }

        #[test]
        fn test_save_and_load_theme() {
            let store = MemoryPreferenceStore::new();
            save_theme(&store, Theme::Retro).unwrap();
            assert_eq!(load_theme(&store), Theme::Retro);
        }

        #[test]
        fn test_load_session_config_defaults() {
            let store = MemoryPreferenceStore::new();
            assert_eq!(load_session_config(&store), SessionConfig::default());
        }

        #[test]
        fn test_load_session_config_restores_durations() {
            let store = MemoryPreferenceStore::new();
            save_duration(&store, Phase::Work, 3000).unwrap();
            save_duration(&store, Phase::Break, 600).unwrap();

            let config = load_session_config(&store);
            assert_eq!(config.work_seconds, 3000);
            assert_eq!(config.break_seconds, 600);
        }

        #[test]
        fn test_load_session_config_skips_invalid_values() {
            let store = MemoryPreferenceStore::with_values([
                (WORK_SECONDS_PREF, "soon"),
                (BREAK_SECONDS_PREF, "0"),
            ]);

            assert_eq!(load_session_config(&store), SessionConfig::default());
        }

        #[test]
        fn test_load_api_key() {
            let store = MemoryPreferenceStore::with_values([(API_KEY_PREF, "sk-abc")]);
            assert_eq!(load_api_key(&store).unwrap().as_deref(), Some("sk-abc"));
        }
    }
}
