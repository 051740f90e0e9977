//! # State Synchronization Core
//!
//! [`VideoSync`] owns the canonical [`PlaybackState`] for one media element.
//!
//! ## Update policy
//!
//! - `paused`, `now` and `duration` are *confirmed* values: commands only
//!   forward to the element, the state moves when the element reports back.
//! - `muted` and `volume` are *optimistic*: commands update the state at
//!   once, persist the preference and forward to the element exactly once.
//!
//! Whenever `muted` or `volume` differ from what was last applied to the
//! current element (including right after an attach), the canonical value is
//! re-applied. Echoed volume events confirm what was applied, so there is no
//! ping-pong between element and core.
//!
//! ## Locking
//!
//! The state mutex is never held while calling into the element, so an
//! element that emits events synchronously from inside a command is fine.
//! It is not held while publishing either, and receivers only hand out
//! owned values, so consumers may issue commands from anywhere.

use bridge_traits::{MediaElement, MediaEvent, MediaEventHandler, MediaEventKind};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::adapter::ResourceAdapter;
use crate::broadcast::{SnapshotBroadcast, VideoContextReceiver, VideoContextValue};
use crate::config::{VideoSyncConfig, VideoSyncProfile};
use crate::controls::VideoControls;
use crate::error::Result;
use crate::preferences::PreferenceStore;
use crate::snapshot::{PlaybackSnapshot, PlaybackState};

/// Values last pushed to the attached element.
#[derive(Debug, Default, Clone, Copy)]
struct AppliedOutputs {
    muted: Option<bool>,
    volume: Option<f64>,
}

#[derive(Debug)]
struct SyncState {
    playback: PlaybackState,
    applied: AppliedOutputs,
    /// Last publish ticket handed out.
    publish_seq: u64,
}

pub(crate) struct SyncCore {
    profile: VideoSyncProfile,
    preferences: PreferenceStore,
    adapter: ResourceAdapter,
    state: Mutex<SyncState>,
    broadcast: SnapshotBroadcast,
    controls: VideoControls,
}

impl SyncCore {
    fn attach(self: &Arc<Self>, element: Arc<dyn MediaElement>) {
        self.adapter.attach(element);

        let core = Arc::downgrade(self);
        for kind in MediaEventKind::ALL {
            let core = core.clone();
            let listener: MediaEventHandler = Arc::new(move |event| {
                if let Some(core) = core.upgrade() {
                    core.handle_event(event);
                }
            });
            self.adapter.subscribe(kind, listener);
        }

        let known_duration = self.adapter.duration();
        {
            let mut state = self.state.lock();
            state.applied = AppliedOutputs::default();
            if let Some(duration) = known_duration {
                debug!(duration, "Adopted duration already known to element");
                state.playback.duration = Some(duration);
            }
        }

        self.reconcile_outputs();
        self.publish();
    }

    fn detach(&self) {
        self.adapter.detach();
        self.state.lock().applied = AppliedOutputs::default();
    }

    pub(crate) fn handle_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::Started => {
                debug!("Element started playing");
                self.update(|state| state.playback.paused = false);
            }
            MediaEvent::Stopped => {
                debug!("Element paused");
                self.update(|state| state.playback.paused = true);
            }
            MediaEvent::TimeUpdated(now) => {
                if !now.is_finite() || now < 0.0 {
                    warn!(now, "Ignoring invalid time update");
                    return;
                }
                trace!(now, "Time updated");
                self.update(|state| state.playback.now = now);
            }
            MediaEvent::DurationChanged(duration) => {
                if !duration.is_finite() || duration < 0.0 {
                    warn!(duration, "Ignoring invalid duration");
                    return;
                }
                debug!(duration, "Duration changed");
                self.update(|state| state.playback.duration = Some(duration));
            }
            MediaEvent::VolumeChanged(volume) => {
                if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
                    warn!(volume, "Ignoring invalid volume report");
                    return;
                }
                let changed = {
                    let mut state = self.state.lock();
                    let changed = state.playback.volume != volume;
                    state.playback.volume = volume;
                    state.applied.volume = Some(volume);
                    changed
                };
                if changed {
                    debug!(volume, "Element volume changed");
                    self.preferences.write_volume(volume);
                }
                self.reconcile_outputs();
                self.publish();
            }
        }
    }

    pub(crate) fn play(&self) {
        debug!("Play requested");
        self.adapter.play();
    }

    pub(crate) fn pause(&self) {
        debug!("Pause requested");
        self.adapter.pause();
    }

    pub(crate) fn seek(&self, position: f64) {
        if !position.is_finite() {
            warn!(position, "Ignoring non-finite seek target");
            return;
        }
        let position = position.max(0.0);
        debug!(position, "Seek requested");
        self.adapter.seek_to(position);
    }

    pub(crate) fn set_volume(&self, volume: f64) {
        if volume.is_nan() {
            warn!("Ignoring NaN volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        debug!(volume, "Volume set");

        {
            let mut state = self.state.lock();
            state.playback.volume = volume;
            state.applied.volume = Some(volume);
        }
        self.preferences.write_volume(volume);
        self.publish();

        self.adapter.set_volume(volume);
        self.reconcile_outputs();
    }

    pub(crate) fn mute(&self, muted: bool) {
        debug!(muted, "Mute set");

        {
            let mut state = self.state.lock();
            state.playback.muted = muted;
            state.applied.muted = Some(muted);
        }
        self.preferences.write_muted(muted);
        self.publish();

        self.adapter.set_muted(muted);
        self.reconcile_outputs();
    }

    fn update(&self, apply: impl FnOnce(&mut SyncState)) {
        {
            let mut state = self.state.lock();
            apply(&mut state);
        }
        self.publish();
    }

    /// Re-apply canonical mute/volume that differ from what the element
    /// last received.
    fn reconcile_outputs(&self) {
        if !self.adapter.is_attached() {
            return;
        }

        let (muted, volume) = {
            let mut state = self.state.lock();
            let SyncState {
                playback, applied, ..
            } = &mut *state;

            let muted = (applied.muted != Some(playback.muted)).then_some(playback.muted);
            let volume = (applied.volume != Some(playback.volume)).then_some(playback.volume);
            if muted.is_some() {
                applied.muted = muted;
            }
            if volume.is_some() {
                applied.volume = volume;
            }
            (muted, volume)
        };

        if let Some(muted) = muted {
            debug!(muted, "Re-applying mute to element");
            self.adapter.set_muted(muted);
        }
        if let Some(volume) = volume {
            debug!(volume, "Re-applying volume to element");
            self.adapter.set_volume(volume);
        }
    }

    // The state lock is released before sending: a consumer reading the
    // channel may call back into `state()`. The ticket keeps late senders from
    // overwriting a newer snapshot.
    fn publish(&self) -> bool {
        let (ticket, snapshot) = {
            let mut state = self.state.lock();
            state.publish_seq += 1;
            let snapshot =
                PlaybackSnapshot::from_state(&state.playback, self.profile.wait_for_duration);
            (state.publish_seq, snapshot)
        };
        let published = self.broadcast.publish(ticket, snapshot, &self.controls);
        if published {
            trace!(version = self.broadcast.version(), "Published snapshot");
        }
        published
    }
}

/// Synchronization core for one media element.
///
/// Dropping a `VideoSync` releases the element's event handler and reverts
/// every receiver to `None`.
pub struct VideoSync {
    core: Arc<SyncCore>,
}

impl VideoSync {
    /// Create a core, seeding mute/volume from persisted preferences.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`VideoSyncConfig::validate`].
    pub fn new(config: VideoSyncConfig) -> Result<Self> {
        config.validate()?;

        let VideoSyncConfig {
            profile,
            settings_store,
        } = config;

        let preferences = PreferenceStore::new(settings_store, profile.persist.clone());
        let muted = preferences.read_muted().unwrap_or(profile.default_muted);
        let volume = preferences.read_volume().unwrap_or(profile.default_volume);

        debug!(
            muted,
            volume,
            expose_seek = profile.expose_seek,
            wait_for_duration = profile.wait_for_duration,
            "Creating video sync core"
        );

        let core = Arc::new_cyclic(|weak| SyncCore {
            controls: VideoControls::new(weak.clone(), profile.expose_seek),
            state: Mutex::new(SyncState {
                playback: PlaybackState::new(muted, volume),
                applied: AppliedOutputs::default(),
                publish_seq: 0,
            }),
            adapter: ResourceAdapter::new(),
            broadcast: SnapshotBroadcast::new(),
            preferences,
            profile,
        });
        core.publish();

        Ok(Self { core })
    }

    /// Bind to `element`, replacing any element attached before.
    ///
    /// Canonical mute/volume are pushed to the new element right away.
    pub fn attach(&self, element: Arc<dyn MediaElement>) {
        self.core.attach(element);
    }

    /// Release the current element. The last snapshot stays published.
    pub fn detach(&self) {
        self.core.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.core.adapter.is_attached()
    }

    /// Feed an element event directly, bypassing the adapter.
    pub fn handle_event(&self, event: MediaEvent) {
        self.core.handle_event(event);
    }

    pub fn play(&self) {
        self.core.play();
    }

    pub fn pause(&self) {
        self.core.pause();
    }

    /// Ask the element to jump to `position` seconds. Works regardless of
    /// whether consumers are given a seeker.
    pub fn seek(&self, position: f64) {
        self.core.seek(position);
    }

    /// Set the volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&self, volume: f64) {
        self.core.set_volume(volume);
    }

    pub fn mute(&self, muted: bool) {
        self.core.mute(muted);
    }

    /// Canonical state, including an unknown duration.
    pub fn state(&self) -> PlaybackState {
        self.core.state.lock().playback
    }

    /// Currently published value, `None` while gated.
    pub fn current(&self) -> Option<VideoContextValue> {
        self.core.broadcast.current()
    }

    pub fn snapshot(&self) -> Option<PlaybackSnapshot> {
        self.current().map(|value| value.snapshot)
    }

    pub fn subscribe(&self) -> VideoContextReceiver {
        self.core.broadcast.subscribe()
    }

    pub fn profile(&self) -> &VideoSyncProfile {
        &self.core.profile
    }
}

impl Drop for VideoSync {
    fn drop(&mut self) {
        self.core.adapter.detach();
        self.core.broadcast.clear();
        debug!("Video sync core torn down");
    }
}

impl fmt::Debug for VideoSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoSync")
            .field("profile", &self.core.profile)
            .field("state", &self.state())
            .field("adapter", &self.core.adapter)
            .field("broadcast", &self.core.broadcast)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> VideoSync {
        VideoSync::new(VideoSyncConfig {
            profile: VideoSyncProfile::minimal(),
            settings_store: None,
        })
        .unwrap()
    }

    #[test]
    fn test_initial_state_published_without_gating() {
        let sync = minimal();
        let snapshot = sync.snapshot().unwrap();
        assert_eq!(snapshot.duration, 0.0);
        assert!(snapshot.paused);
        assert_eq!(snapshot.version, 1);
    }

    #[test]
    fn test_gated_until_duration() {
        let sync = VideoSync::new(VideoSyncConfig::default()).unwrap();
        assert!(sync.current().is_none());

        sync.handle_event(MediaEvent::DurationChanged(42.0));
        assert_eq!(sync.snapshot().unwrap().duration, 42.0);
    }

    #[test]
    fn test_events_without_element() {
        let sync = minimal();
        sync.handle_event(MediaEvent::Started);
        assert!(!sync.state().paused);
        sync.handle_event(MediaEvent::Stopped);
        assert!(sync.state().paused);
        sync.handle_event(MediaEvent::TimeUpdated(3.5));
        assert_eq!(sync.state().now, 3.5);
    }

    #[test]
    fn test_invalid_payloads_ignored() {
        let sync = minimal();
        sync.handle_event(MediaEvent::TimeUpdated(f64::NAN));
        sync.handle_event(MediaEvent::TimeUpdated(-1.0));
        sync.handle_event(MediaEvent::DurationChanged(f64::INFINITY));
        sync.handle_event(MediaEvent::VolumeChanged(2.0));

        let state = sync.state();
        assert_eq!(state.now, 0.0);
        assert_eq!(state.duration, None);
        assert_eq!(state.volume, 1.0);
    }

    #[test]
    fn test_set_volume_clamps() {
        let sync = minimal();
        sync.set_volume(1.7);
        assert_eq!(sync.state().volume, 1.0);
        sync.set_volume(-0.2);
        assert_eq!(sync.state().volume, 0.0);
        sync.set_volume(f64::NAN);
        assert_eq!(sync.state().volume, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = VideoSyncConfig {
            profile: VideoSyncProfile {
                default_volume: 3.0,
                ..VideoSyncProfile::default()
            },
            settings_store: None,
        };
        assert!(VideoSync::new(config).is_err());
    }

    #[test]
    fn test_controls_die_with_core() {
        let sync = minimal();
        let controls = sync.current().unwrap().controls;
        assert!(controls.is_live());
        drop(sync);
        assert!(!controls.is_live());
        controls.set_volume(0.2);
    }
}
