//! Allow-listed preference persistence.
//!
//! Wraps an optional [`SettingsStore`] so that only keys the host opted into
//! are ever read or written. Store failures are logged and swallowed: a
//! failed read behaves like a missing key, a failed write is dropped.

use bridge_traits::SettingsStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::PlaybackError;

/// Preference keys eligible for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKey {
    Mute,
    Volume,
}

impl PreferenceKey {
    /// Storage key used in the settings store.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Mute => "mute",
            PreferenceKey::Volume => "volume",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mute" => Ok(PreferenceKey::Mute),
            "volume" => Ok(PreferenceKey::Volume),
            other => Err(PlaybackError::Config(format!(
                "Unknown preference key: {}",
                other
            ))),
        }
    }
}

pub(crate) fn encode_muted(muted: bool) -> String {
    muted.to_string()
}

/// Anything other than `"true"` reads as unmuted.
pub(crate) fn decode_muted(raw: &str) -> bool {
    raw == "true"
}

pub(crate) fn encode_volume(volume: f64) -> String {
    volume.to_string()
}

/// `None` for non-numeric, non-finite or out-of-range values.
pub(crate) fn decode_volume(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
}

/// Allow-list gate in front of the host settings store.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Option<Arc<dyn SettingsStore>>,
    allowed: BTreeSet<PreferenceKey>,
}

impl PreferenceStore {
    pub fn new(store: Option<Arc<dyn SettingsStore>>, allowed: BTreeSet<PreferenceKey>) -> Self {
        Self { store, allowed }
    }

    /// A store that never persists anything.
    pub fn ephemeral() -> Self {
        Self::new(None, BTreeSet::new())
    }

    /// Whether values for `key` go to durable storage.
    pub fn is_persisted(&self, key: PreferenceKey) -> bool {
        self.store.is_some() && self.allowed.contains(&key)
    }

    /// Read the raw stored string. Empty strings count as absent.
    pub fn read(&self, key: PreferenceKey) -> Option<String> {
        if !self.allowed.contains(&key) {
            return None;
        }
        let store = self.store.as_ref()?;

        match store.get_string(key.as_str()) {
            Ok(Some(value)) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read preference, using default");
                None
            }
        }
    }

    /// Write the raw string. Best-effort, never retried.
    pub fn write(&self, key: PreferenceKey, value: &str) {
        if !self.allowed.contains(&key) {
            return;
        }
        let Some(store) = self.store.as_ref() else {
            return;
        };

        match store.set_string(key.as_str(), value) {
            Ok(()) => debug!(key = %key, value = value, "Persisted preference"),
            Err(e) => warn!(key = %key, error = %e, "Failed to persist preference"),
        }
    }

    pub fn read_muted(&self) -> Option<bool> {
        self.read(PreferenceKey::Mute).map(|raw| decode_muted(&raw))
    }

    pub fn read_volume(&self) -> Option<f64> {
        let raw = self.read(PreferenceKey::Volume)?;
        let volume = decode_volume(&raw);
        if volume.is_none() {
            warn!(raw = %raw, "Ignoring malformed stored volume");
        }
        volume
    }

    pub fn write_muted(&self, muted: bool) {
        self.write(PreferenceKey::Mute, &encode_muted(muted));
    }

    pub fn write_volume(&self, volume: f64) {
        self.write(PreferenceKey::Volume, &encode_volume(volume));
    }
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("store", &self.store.as_ref().map(|_| "SettingsStore { ... }"))
            .field("allowed", &self.allowed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;

    mock! {
        pub Settings {}

        impl SettingsStore for Settings {
            fn set_string(&self, key: &str, value: &str) -> BridgeResult<()>;
            fn get_string(&self, key: &str) -> BridgeResult<Option<String>>;
            fn delete(&self, key: &str) -> BridgeResult<()>;
            fn has_key(&self, key: &str) -> BridgeResult<bool>;
            fn list_keys(&self) -> BridgeResult<Vec<String>>;
            fn clear_all(&self) -> BridgeResult<()>;
        }
    }

    fn allow(keys: &[PreferenceKey]) -> BTreeSet<PreferenceKey> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_volume_encoding() {
        assert_eq!(encode_volume(0.4), "0.4");
        assert_eq!(encode_volume(1.0), "1");
        assert_eq!(encode_volume(0.0), "0");
        assert_eq!(decode_volume("0.4"), Some(0.4));
        assert_eq!(decode_volume(" 1 "), Some(1.0));
        assert_eq!(decode_volume("loud"), None);
        assert_eq!(decode_volume("NaN"), None);
        assert_eq!(decode_volume("1.5"), None);
        assert_eq!(decode_volume("-0.1"), None);
    }

    #[test]
    fn test_mute_encoding() {
        assert_eq!(encode_muted(true), "true");
        assert_eq!(encode_muted(false), "false");
        assert!(decode_muted("true"));
        assert!(!decode_muted("false"));
        assert!(!decode_muted("TRUE"));
        assert!(!decode_muted("1"));
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("mute".parse::<PreferenceKey>().unwrap(), PreferenceKey::Mute);
        assert_eq!("volume".parse::<PreferenceKey>().unwrap(), PreferenceKey::Volume);
        assert!("brightness".parse::<PreferenceKey>().is_err());
    }

    #[test]
    fn test_write_allowed_key() {
        let mut store = MockSettings::new();
        store
            .expect_set_string()
            .withf(|key, value| key == "volume" && value == "0.4")
            .times(1)
            .returning(|_, _| Ok(()));

        let prefs = PreferenceStore::new(Some(Arc::new(store)), allow(&[PreferenceKey::Volume]));
        prefs.write_volume(0.4);
    }

    #[test]
    fn test_key_outside_allow_list_never_touches_store() {
        let mut store = MockSettings::new();
        store.expect_set_string().times(0);
        store.expect_get_string().times(0);

        let prefs = PreferenceStore::new(Some(Arc::new(store)), allow(&[PreferenceKey::Volume]));
        prefs.write_muted(true);
        assert_eq!(prefs.read_muted(), None);
        assert!(!prefs.is_persisted(PreferenceKey::Mute));
        assert!(prefs.is_persisted(PreferenceKey::Volume));
    }

    #[test]
    fn test_failed_read_is_absent() {
        let mut store = MockSettings::new();
        store
            .expect_get_string()
            .returning(|_| Err(BridgeError::NotAvailable("localStorage".to_string())));

        let prefs = PreferenceStore::new(Some(Arc::new(store)), allow(&[PreferenceKey::Volume]));
        assert_eq!(prefs.read_volume(), None);
    }

    #[test]
    fn test_failed_write_is_swallowed() {
        let mut store = MockSettings::new();
        store
            .expect_set_string()
            .times(1)
            .returning(|_, _| Err(BridgeError::OperationFailed("quota exceeded".to_string())));

        let prefs = PreferenceStore::new(Some(Arc::new(store)), allow(&[PreferenceKey::Mute]));
        prefs.write_muted(true);
    }

    #[test]
    fn test_empty_and_malformed_values_are_absent() {
        let mut store = MockSettings::new();
        store
            .expect_get_string()
            .withf(|key| key == "mute")
            .returning(|_| Ok(Some(String::new())));
        store
            .expect_get_string()
            .withf(|key| key == "volume")
            .returning(|_| Ok(Some("very loud".to_string())));

        let prefs = PreferenceStore::new(
            Some(Arc::new(store)),
            allow(&[PreferenceKey::Mute, PreferenceKey::Volume]),
        );
        assert_eq!(prefs.read_muted(), None);
        assert_eq!(prefs.read_volume(), None);
    }

    #[test]
    fn test_ephemeral_store() {
        let prefs = PreferenceStore::ephemeral();
        prefs.write_volume(0.2);
        assert_eq!(prefs.read_volume(), None);
        assert!(!prefs.is_persisted(PreferenceKey::Volume));
    }
}
