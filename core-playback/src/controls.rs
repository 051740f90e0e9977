//! Command handle published to consumers alongside each snapshot.

use std::fmt;
use std::sync::Weak;

use crate::sync::SyncCore;

/// Commands a consumer may issue.
///
/// Holds only a weak reference to the core: once the owning
/// [`VideoSync`](crate::VideoSync) is dropped every command is a no-op.
///
/// Commands publish a new snapshot before returning. Take the handle out of
/// the receiver with [`VideoContextReceiver::get`](crate::VideoContextReceiver::get)
/// rather than holding a raw `watch::Ref` of the channel across a call, which
/// would block on the channel lock.
#[derive(Clone)]
pub struct VideoControls {
    core: Weak<SyncCore>,
    seekable: bool,
}

impl VideoControls {
    pub(crate) fn new(core: Weak<SyncCore>, seekable: bool) -> Self {
        Self { core, seekable }
    }

    /// A handle bound to nothing. Every command is a no-op.
    pub fn detached() -> Self {
        Self::new(Weak::new(), false)
    }

    pub fn play(&self) {
        if let Some(core) = self.core.upgrade() {
            core.play();
        }
    }

    pub fn pause(&self) {
        if let Some(core) = self.core.upgrade() {
            core.pause();
        }
    }

    pub fn mute(&self, muted: bool) {
        if let Some(core) = self.core.upgrade() {
            core.mute(muted);
        }
    }

    pub fn set_volume(&self, volume: f64) {
        if let Some(core) = self.core.upgrade() {
            core.set_volume(volume);
        }
    }

    /// Seek capability, present only when the core exposes seeking.
    pub fn seeker(&self) -> Option<Seeker> {
        self.seekable.then(|| Seeker {
            core: self.core.clone(),
        })
    }

    pub fn can_seek(&self) -> bool {
        self.seekable
    }

    /// Whether the core behind this handle still exists.
    pub fn is_live(&self) -> bool {
        self.core.strong_count() > 0
    }
}

impl fmt::Debug for VideoControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoControls")
            .field("seekable", &self.seekable)
            .field("live", &self.is_live())
            .finish()
    }
}

/// Seek capability split out of [`VideoControls`].
#[derive(Clone)]
pub struct Seeker {
    core: Weak<SyncCore>,
}

impl Seeker {
    /// Ask the element to jump to `position` seconds.
    ///
    /// The published position only moves once the element reports it.
    pub fn seek(&self, position: f64) {
        if let Some(core) = self.core.upgrade() {
            core.seek(position);
        }
    }
}

impl fmt::Debug for Seeker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seeker").finish_non_exhaustive()
    }
}
