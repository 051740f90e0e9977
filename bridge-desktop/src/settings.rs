//! Settings Storage using a JSON file

use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SETTINGS_FILE_NAME: &str = "settings.json";

/// JSON-file-backed settings store implementation
///
/// Keeps every value in memory and rewrites the whole file on each change:
/// - Values survive process restarts
/// - Writes go to a sibling temp file first, then replace the original
/// - Reads never touch the disk after `open`
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonSettingsStore {
    /// Open (or create) a settings file at the given path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = ?path, keys = values.len(), "Initialized settings store");

        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    /// Create an in-memory settings store (for testing)
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Resolve `<config dir>/<app_name>/settings.json` for the current user
    pub fn default_path(app_name: &str) -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| BridgeError::NotAvailable("user config directory".to_string()))?;
        Ok(base.join(app_name).join(SETTINGS_FILE_NAME))
    }

    /// Backing file, or `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(values)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to replace settings file: {}", e)))?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write();
        let previous = values.insert(key.to_string(), value.to_string());
        if previous.as_deref() == Some(value) {
            return Ok(());
        }

        if let Err(e) = self.persist(&values) {
            // Keep memory consistent with disk
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }

        debug!(key = key, "Stored setting");
        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.write();
        if values.remove(key).is_some() {
            self.persist(&values)?;
            debug!(key = key, "Deleted setting");
        }
        Ok(())
    }

    fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.values.read().contains_key(key))
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read().keys().cloned().collect())
    }

    fn clear_all(&self) -> Result<()> {
        let mut values = self.values.write();
        values.clear();
        self.persist(&values)?;

        debug!("Cleared all settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_operations() {
        let store = JsonSettingsStore::in_memory();

        store.set_string("volume", "0.4").unwrap();
        let value = store.get_string("volume").unwrap();
        assert_eq!(value, Some("0.4".to_string()));

        store.delete("volume").unwrap();
        let value = store.get_string("volume").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_list_keys() {
        let store = JsonSettingsStore::in_memory();

        store.set_string("volume", "1").unwrap();
        store.set_string("mute", "false").unwrap();

        let keys = store.list_keys().unwrap();
        assert_eq!(keys, vec!["mute", "volume"]);
    }

    #[test]
    fn test_in_memory_has_no_path() {
        let store = JsonSettingsStore::in_memory();
        assert!(store.path().is_none());
        store.clear_all().unwrap();
        assert!(store.list_keys().unwrap().is_empty());
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        if let Ok(path) = JsonSettingsStore::default_path("video-sync") {
            assert!(path.ends_with("video-sync/settings.json"));
        }
    }
}
