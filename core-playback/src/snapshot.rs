//! Canonical playback state and the immutable snapshots published from it.

use serde::{Deserialize, Serialize};

/// Canonical, mutable playback state owned by the synchronization core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Elapsed position in seconds.
    pub now: f64,
    /// Media length in seconds, `None` until the element reports it.
    pub duration: Option<f64>,
    /// `true` until a started event is observed.
    pub paused: bool,
    pub muted: bool,
    /// Output volume in `0.0..=1.0`.
    pub volume: f64,
}

impl PlaybackState {
    /// Initial state before any element event or stored preference.
    pub fn new(muted: bool, volume: f64) -> Self {
        Self {
            now: 0.0,
            duration: None,
            paused: true,
            muted,
            volume,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(false, 1.0)
    }
}

/// One published version of the playback state.
///
/// Snapshots are never mutated: every change produces a new value with a
/// higher `version`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub now: f64,
    pub duration: f64,
    pub paused: bool,
    pub muted: bool,
    pub volume: f64,
    pub version: u64,
}

impl PlaybackSnapshot {
    /// Build a snapshot from canonical state.
    ///
    /// Returns `None` when the duration is still unknown and
    /// `wait_for_duration` is set. Otherwise an unknown duration reads as 0.
    pub fn from_state(state: &PlaybackState, wait_for_duration: bool) -> Option<Self> {
        let duration = match state.duration {
            Some(duration) => duration,
            None if wait_for_duration => return None,
            None => 0.0,
        };

        Some(Self {
            now: state.now,
            duration,
            paused: state.paused,
            muted: state.muted,
            volume: state.volume,
            version: 0,
        })
    }

    /// Compare everything except the version counter.
    pub fn same_state(&self, other: &Self) -> bool {
        self.now == other.now
            && self.duration == other.duration
            && self.paused == other.paused
            && self.muted == other.muted
            && self.volume == other.volume
    }

    /// Fraction of the media already played, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.now / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_paused_at_full_volume() {
        let state = PlaybackState::default();
        assert!(state.paused);
        assert!(!state.muted);
        assert_eq!(state.volume, 1.0);
        assert_eq!(state.now, 0.0);
        assert_eq!(state.duration, None);
    }

    #[test]
    fn unknown_duration_gates_snapshot() {
        let state = PlaybackState::default();
        assert!(PlaybackSnapshot::from_state(&state, true).is_none());

        let snapshot = PlaybackSnapshot::from_state(&state, false).unwrap();
        assert_eq!(snapshot.duration, 0.0);
    }

    #[test]
    fn same_state_ignores_version() {
        let state = PlaybackState {
            duration: Some(120.0),
            ..PlaybackState::default()
        };
        let a = PlaybackSnapshot::from_state(&state, true).unwrap();
        let b = PlaybackSnapshot { version: 7, ..a };
        assert!(a.same_state(&b));
        assert_ne!(a, b);

        let c = PlaybackSnapshot { now: 1.0, ..a };
        assert!(!a.same_state(&c));
    }

    #[test]
    fn progress_is_clamped() {
        let state = PlaybackState {
            now: 30.0,
            duration: Some(120.0),
            ..PlaybackState::default()
        };
        let snapshot = PlaybackSnapshot::from_state(&state, true).unwrap();
        assert_eq!(snapshot.progress(), 0.25);

        let zero = PlaybackSnapshot::from_state(&PlaybackState::default(), false).unwrap();
        assert_eq!(zero.progress(), 0.0);
    }
}
