//! Workspace façade crate.
//!
//! Re-exports the synchronization core together with the bridge traits hosts
//! must implement. With the `desktop-shims` feature (default) the desktop
//! settings store and the logging runtime are re-exported as well, so a host
//! application can depend on `video-sync` alone.

pub use bridge_traits;
pub use core_playback::*;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
#[cfg(feature = "desktop-shims")]
pub use core_runtime;
