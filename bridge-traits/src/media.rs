//! Media element bridge trait and the event vocabulary it emits.
//!
//! A [`MediaElement`] is the host-owned playback surface: an
//! `HTMLVideoElement` on the web, a native player view on desktop or mobile.
//! The core never owns it. It issues fire-and-forget commands and observes the
//! element through a single event handler slot, mirroring how DOM media
//! elements expose `onplay`/`onpause`/... properties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::platform::PlatformSendSync;

/// Change notification emitted by a media element.
///
/// Payloads carry the element's own view of the changed value (seconds for
/// time and duration, `0.0..=1.0` for volume).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value")]
pub enum MediaEvent {
    /// Playback started or resumed.
    Started,
    /// Playback paused.
    Stopped,
    /// Element volume changed (user moved the native slider, or a command landed).
    VolumeChanged(f64),
    /// Playback position advanced or jumped.
    TimeUpdated(f64),
    /// Element learned (or re-learned) the media duration.
    DurationChanged(f64),
}

impl MediaEvent {
    /// Returns the discriminant used for listener registration.
    pub fn kind(&self) -> MediaEventKind {
        match self {
            MediaEvent::Started => MediaEventKind::Started,
            MediaEvent::Stopped => MediaEventKind::Stopped,
            MediaEvent::VolumeChanged(_) => MediaEventKind::VolumeChanged,
            MediaEvent::TimeUpdated(_) => MediaEventKind::TimeUpdated,
            MediaEvent::DurationChanged(_) => MediaEventKind::DurationChanged,
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &'static str {
        self.kind().description()
    }
}

/// Payload-free discriminant of [`MediaEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaEventKind {
    Started,
    Stopped,
    VolumeChanged,
    TimeUpdated,
    DurationChanged,
}

impl MediaEventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [MediaEventKind; 5] = [
        MediaEventKind::Started,
        MediaEventKind::Stopped,
        MediaEventKind::VolumeChanged,
        MediaEventKind::TimeUpdated,
        MediaEventKind::DurationChanged,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            MediaEventKind::Started => "Playback started",
            MediaEventKind::Stopped => "Playback paused",
            MediaEventKind::VolumeChanged => "Volume changed",
            MediaEventKind::TimeUpdated => "Playback position changed",
            MediaEventKind::DurationChanged => "Duration changed",
        }
    }
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Callback installed on a media element to receive its events.
#[cfg(not(target_arch = "wasm32"))]
pub type MediaEventHandler = Arc<dyn Fn(MediaEvent) + Send + Sync>;

#[cfg(target_arch = "wasm32")]
pub type MediaEventHandler = Arc<dyn Fn(MediaEvent)>;

/// Host-owned media playback surface.
///
/// Commands return immediately. Their effect, if any, is reported later
/// through the installed [`MediaEventHandler`]. Implementations may invoke
/// the handler synchronously from inside a command (a DOM element does this
/// for `volumechange`), so callers must not hold locks across command calls.
pub trait MediaElement: PlatformSendSync {
    /// Begin or resume playback.
    fn play(&self);

    /// Pause playback.
    fn pause(&self);

    /// Jump to an absolute position in seconds. The element may clamp it.
    fn set_current_time(&self, seconds: f64);

    /// Set output volume, normalized to `0.0..=1.0`.
    fn set_volume(&self, volume: f64);

    /// Mute or unmute output without touching the volume level.
    fn set_muted(&self, muted: bool);

    /// Media duration in seconds, or `None` before metadata has loaded.
    fn duration(&self) -> Option<f64>;

    /// Install the event handler, replacing any previous one. `None` clears it.
    fn set_event_handler(&self, handler: Option<MediaEventHandler>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_matches_variant() {
        assert_eq!(MediaEvent::Started.kind(), MediaEventKind::Started);
        assert_eq!(MediaEvent::VolumeChanged(0.3).kind(), MediaEventKind::VolumeChanged);
        assert_eq!(MediaEvent::DurationChanged(12.0).kind(), MediaEventKind::DurationChanged);
    }

    #[test]
    fn event_serializes_with_tag() {
        let json = serde_json::to_string(&MediaEvent::TimeUpdated(4.5)).unwrap();
        assert_eq!(json, r#"{"event":"TimeUpdated","value":4.5}"#);

        let back: MediaEvent = serde_json::from_str(r#"{"event":"Stopped"}"#).unwrap();
        assert_eq!(back, MediaEvent::Stopped);
    }

    #[test]
    fn all_kinds_are_distinct() {
        let mut kinds = MediaEventKind::ALL.to_vec();
        kinds.dedup();
        assert_eq!(kinds.len(), 5);
    }
}
