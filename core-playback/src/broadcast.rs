//! # Snapshot Broadcast
//!
//! Distributes the current [`VideoContextValue`] to any number of consumers
//! using `tokio::sync::watch`.
//!
//! ## Semantics
//!
//! - Receivers always see the latest value; intermediate versions may be
//!   skipped by slow consumers, but never a half-updated one.
//! - `None` means "not ready": either the element has not reported a
//!   duration yet (when gating is enabled) or the core was torn down.
//! - Publishing a snapshot equal to the current one (ignoring `version`) is
//!   a no-op, so receivers are not woken for unchanged state.
//! - Every publish carries a ticket taken under the core's state lock. A
//!   ticket older than the last accepted one is dropped, so a publisher that
//!   lost a race never overwrites a newer snapshot.
//!
//! Receivers hand out owned copies of the value, never a borrow of the
//! channel. Commands issued through [`VideoControls`] publish, and a borrow
//! held across them would block the publishing thread.
//!
//! ## Usage
//!
//! ```ignore
//! let mut rx = sync.subscribe();
//! while rx.changed().await.is_ok() {
//!     if let Some(value) = rx.get_and_update() {
//!         render(value.snapshot.now, value.snapshot.duration);
//!     }
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

pub use tokio::sync::watch::error::RecvError;

use crate::controls::VideoControls;
use crate::snapshot::PlaybackSnapshot;

/// What consumers receive: the snapshot plus the command handle.
#[derive(Clone)]
pub struct VideoContextValue {
    pub snapshot: PlaybackSnapshot,
    pub controls: VideoControls,
}

impl fmt::Debug for VideoContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoContextValue")
            .field("snapshot", &self.snapshot)
            .field("controls", &self.controls)
            .finish()
    }
}

/// Receiving half handed to consumers.
///
/// Wraps a `watch::Receiver` but only returns clones of the published value,
/// so no channel lock is ever held while a consumer runs commands.
#[derive(Clone)]
pub struct VideoContextReceiver {
    inner: watch::Receiver<Option<VideoContextValue>>,
}

impl VideoContextReceiver {
    /// Latest published value.
    pub fn get(&self) -> Option<VideoContextValue> {
        self.inner.borrow().clone()
    }

    /// Latest published value, marking it as seen.
    pub fn get_and_update(&mut self) -> Option<VideoContextValue> {
        self.inner.borrow_and_update().clone()
    }

    pub fn snapshot(&self) -> Option<PlaybackSnapshot> {
        self.inner.borrow().as_ref().map(|value| value.snapshot)
    }

    /// Whether a value was published since the last `get_and_update`.
    ///
    /// Errors once the core is gone.
    pub fn has_changed(&self) -> Result<bool, RecvError> {
        self.inner.has_changed()
    }

    /// Wait for the next published value.
    pub async fn changed(&mut self) -> Result<(), RecvError> {
        self.inner.changed().await
    }
}

impl fmt::Debug for VideoContextReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoContextReceiver")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// Publishing half owned by the synchronization core.
pub struct SnapshotBroadcast {
    sender: watch::Sender<Option<VideoContextValue>>,
    version: AtomicU64,
    accepted_ticket: AtomicU64,
}

impl SnapshotBroadcast {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            version: AtomicU64::new(0),
            accepted_ticket: AtomicU64::new(0),
        }
    }

    /// Publish `snapshot` with a fresh version.
    ///
    /// `ticket` orders publishers: anything not newer than the last accepted
    /// ticket is dropped. Returns `true` if receivers were notified.
    pub fn publish(
        &self,
        ticket: u64,
        snapshot: Option<PlaybackSnapshot>,
        controls: &VideoControls,
    ) -> bool {
        self.sender.send_if_modified(|current| {
            // Runs under the channel's write lock, so tickets are serialized
            if ticket <= self.accepted_ticket.load(Ordering::SeqCst) {
                return false;
            }
            self.accepted_ticket.store(ticket, Ordering::SeqCst);

            let unchanged = match (current.as_ref(), snapshot.as_ref()) {
                (None, None) => true,
                (Some(existing), Some(next)) => existing.snapshot.same_state(next),
                _ => false,
            };
            if unchanged {
                return false;
            }

            *current = snapshot.map(|snapshot| VideoContextValue {
                snapshot: PlaybackSnapshot {
                    version: self.next_version(),
                    ..snapshot
                },
                controls: controls.clone(),
            });
            true
        })
    }

    /// Revert to "not ready".
    pub fn clear(&self) -> bool {
        self.sender.send_if_modified(|current| current.take().is_some())
    }

    pub fn subscribe(&self) -> VideoContextReceiver {
        VideoContextReceiver {
            inner: self.sender.subscribe(),
        }
    }

    pub fn current(&self) -> Option<VideoContextValue> {
        self.sender.borrow().clone()
    }

    /// Version of the most recently published snapshot (0 before the first).
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Default for SnapshotBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnapshotBroadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotBroadcast")
            .field("version", &self.version())
            .field("receivers", &self.receiver_count())
            .finish()
    }
}
