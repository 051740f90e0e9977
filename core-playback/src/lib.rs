//! # Playback State Synchronization
//!
//! Keeps a single canonical playback snapshot in step with a host-owned
//! media element and broadcasts it to any number of consumers.
//!
//! ## Overview
//!
//! This module handles:
//! - Reconciling element events (play, pause, volume, time, duration) into
//!   the canonical [`PlaybackState`]
//! - Forwarding consumer commands to the element through [`ResourceAdapter`]
//! - Persisting allow-listed preferences (mute, volume) through a
//!   [`SettingsStore`](bridge_traits::SettingsStore)
//! - Publishing versioned [`PlaybackSnapshot`]s over a `tokio::sync::watch`
//!   channel
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{PreferenceKey, VideoSync, VideoSyncConfig};
//!
//! let config = VideoSyncConfig::builder()
//!     .persist(PreferenceKey::Volume)
//!     .settings_store(store)
//!     .build()?;
//!
//! let sync = VideoSync::new(config)?;
//! sync.attach(element);
//!
//! let rx = sync.subscribe();
//! if let Some(value) = rx.get() {
//!     value.controls.play();
//! }
//! ```

pub mod adapter;
pub mod broadcast;
pub mod config;
pub mod controls;
pub mod error;
pub mod preferences;
pub mod snapshot;
pub mod sync;

pub use adapter::ResourceAdapter;
pub use broadcast::{RecvError, SnapshotBroadcast, VideoContextReceiver, VideoContextValue};
pub use config::{VideoSyncConfig, VideoSyncConfigBuilder, VideoSyncProfile};
pub use controls::{Seeker, VideoControls};
pub use error::{PlaybackError, Result};
pub use preferences::{PreferenceKey, PreferenceStore};
pub use snapshot::{PlaybackSnapshot, PlaybackState};
pub use sync::VideoSync;
