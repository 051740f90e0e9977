//! # Synchronization Configuration
//!
//! [`VideoSyncProfile`] holds the plain behaviour switches and can be shipped
//! as JSON by the host. [`VideoSyncConfig`] pairs a profile with the injected
//! settings store and is produced by a fail-fast builder.
//!
//! ```ignore
//! use core_playback::{PreferenceKey, VideoSyncConfig};
//!
//! let config = VideoSyncConfig::builder()
//!     .persist(PreferenceKey::Volume)
//!     .settings_store(store)
//!     .build()?;
//! ```

use bridge_traits::SettingsStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::error::{PlaybackError, Result};
use crate::preferences::PreferenceKey;

/// Behaviour switches of one synchronization core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSyncProfile {
    /// Preference keys written to and read from the settings store.
    ///
    /// Default: empty (nothing persisted).
    #[serde(default)]
    pub persist: BTreeSet<PreferenceKey>,

    /// Whether consumers get a seek capability.
    ///
    /// Default: true.
    #[serde(default = "default_expose_seek")]
    pub expose_seek: bool,

    /// Publish nothing until the element reports a duration.
    ///
    /// When false, an unknown duration is published as 0.
    ///
    /// Default: true.
    #[serde(default = "default_wait_for_duration")]
    pub wait_for_duration: bool,

    /// Muted state used when nothing is persisted.
    ///
    /// Default: false.
    #[serde(default)]
    pub default_muted: bool,

    /// Volume used when nothing valid is persisted.
    ///
    /// Default: 1.0.
    #[serde(default = "default_volume")]
    pub default_volume: f64,
}

impl Default for VideoSyncProfile {
    fn default() -> Self {
        Self {
            persist: BTreeSet::new(),
            expose_seek: default_expose_seek(),
            wait_for_duration: default_wait_for_duration(),
            default_muted: false,
            default_volume: default_volume(),
        }
    }
}

impl VideoSyncProfile {
    /// Persist the given keys, expose seeking and gate on duration.
    pub fn full(persist: impl IntoIterator<Item = PreferenceKey>) -> Self {
        Self {
            persist: persist.into_iter().collect(),
            ..Default::default()
        }
    }

    /// No persistence, no seeking, duration published as 0 until known.
    pub fn minimal() -> Self {
        Self {
            persist: BTreeSet::new(),
            expose_seek: false,
            wait_for_duration: false,
            ..Default::default()
        }
    }

    /// Validate profile values.
    pub fn validate(&self) -> Result<()> {
        if !self.default_volume.is_finite() || !(0.0..=1.0).contains(&self.default_volume) {
            return Err(PlaybackError::InvalidVolume(self.default_volume));
        }
        Ok(())
    }
}

fn default_expose_seek() -> bool {
    true
}

fn default_wait_for_duration() -> bool {
    true
}

fn default_volume() -> f64 {
    1.0
}

/// Validated configuration for [`crate::VideoSync`].
#[derive(Clone)]
pub struct VideoSyncConfig {
    pub profile: VideoSyncProfile,
    pub settings_store: Option<Arc<dyn SettingsStore>>,
}

impl VideoSyncConfig {
    pub fn builder() -> VideoSyncConfigBuilder {
        VideoSyncConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// An allow-list without a store is accepted: the core then runs
    /// without persistence and starts from the profile defaults.
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;

        if !self.profile.persist.is_empty() && self.settings_store.is_none() {
            let keys: Vec<&str> = self.profile.persist.iter().map(|k| k.as_str()).collect();
            warn!(
                keys = %keys.join(", "),
                "No SettingsStore provided; preferences will not be persisted"
            );
        }

        Ok(())
    }
}

impl Default for VideoSyncConfig {
    fn default() -> Self {
        Self {
            profile: VideoSyncProfile::default(),
            settings_store: None,
        }
    }
}

impl fmt::Debug for VideoSyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoSyncConfig")
            .field("profile", &self.profile)
            .field(
                "settings_store",
                &self.settings_store.as_ref().map(|_| "SettingsStore { ... }"),
            )
            .finish()
    }
}

/// Builder for [`VideoSyncConfig`].
#[derive(Default)]
pub struct VideoSyncConfigBuilder {
    profile: VideoSyncProfile,
    settings_store: Option<Arc<dyn SettingsStore>>,
}

impl VideoSyncConfigBuilder {
    /// Adds a key to the persistence allow-list.
    pub fn persist(mut self, key: PreferenceKey) -> Self {
        self.profile.persist.insert(key);
        self
    }

    /// Replaces the persistence allow-list.
    pub fn persist_all(mut self, keys: impl IntoIterator<Item = PreferenceKey>) -> Self {
        self.profile.persist = keys.into_iter().collect();
        self
    }

    /// Default: true
    pub fn expose_seek(mut self, enabled: bool) -> Self {
        self.profile.expose_seek = enabled;
        self
    }

    /// Default: true
    pub fn wait_for_duration(mut self, enabled: bool) -> Self {
        self.profile.wait_for_duration = enabled;
        self
    }

    /// Default: false
    pub fn default_muted(mut self, muted: bool) -> Self {
        self.profile.default_muted = muted;
        self
    }

    /// Default: 1.0. Must lie in `0.0..=1.0`.
    pub fn default_volume(mut self, volume: f64) -> Self {
        self.profile.default_volume = volume;
        self
    }

    /// Sets the settings store backing persisted preferences.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Replaces every behaviour switch at once.
    pub fn profile(mut self, profile: VideoSyncProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Builds the final `VideoSyncConfig` instance.
    ///
    /// # Errors
    ///
    /// - `InvalidVolume` if the default volume is outside `0.0..=1.0`
    pub fn build(self) -> Result<VideoSyncConfig> {
        let config = VideoSyncConfig {
            profile: self.profile,
            settings_store: self.settings_store,
        };
        config.validate()?;
        Ok(config)
    }
}
