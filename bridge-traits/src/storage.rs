//! Settings Storage Abstraction
//!
//! Provides a platform-agnostic trait for durable key-value preference
//! storage.

use crate::{error::Result, platform::PlatformSendSync};

/// Key-value settings storage trait
///
/// Abstracts platform-specific preferences storage:
/// - Web: `localStorage`
/// - iOS: UserDefaults
/// - Android: SharedPreferences
/// - Desktop: JSON file in the user's config directory
///
/// Calls are synchronous. Preference reads happen while the playback core is
/// reconciling state, and every supported backend answers from memory or a
/// small local file.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// fn remember_volume(store: &dyn SettingsStore, volume: f64) -> Result<()> {
///     store.set_string("volume", &volume.to_string())
/// }
/// ```
pub trait SettingsStore: PlatformSendSync {
    /// Store a string value, replacing any previous value
    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key)?.is_some())
    }

    /// List all setting keys
    fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    fn clear_all(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        values: Mutex<BTreeMap<String, String>>,
    }

    impl SettingsStore for MapStore {
        fn set_string(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get_string(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn delete(&self, key: &str) -> Result<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }

        fn list_keys(&self) -> Result<Vec<String>> {
            Ok(self.values.lock().unwrap().keys().cloned().collect())
        }

        fn clear_all(&self) -> Result<()> {
            self.values.lock().unwrap().clear();
            Ok(())
        }
    }

    #[test]
    fn test_has_key_default_uses_get_string() {
        let store = MapStore::default();
        assert!(!store.has_key("mute").unwrap());

        store.set_string("mute", "true").unwrap();
        assert!(store.has_key("mute").unwrap());

        store.delete("mute").unwrap();
        assert!(!store.has_key("mute").unwrap());
    }

    #[test]
    fn test_store_usable_as_trait_object() {
        let store: Box<dyn SettingsStore> = Box::new(MapStore::default());
        store.set_string("volume", "0.5").unwrap();
        assert_eq!(store.list_keys().unwrap(), vec!["volume".to_string()]);
    }
}
