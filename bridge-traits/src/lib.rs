//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback synchronization core
//! and the host application. Each trait represents a capability the core
//! needs but cannot own itself:
//!
//! - [`MediaElement`](media::MediaElement) - The externally-owned video
//!   surface (a `<video>` element, a native player view, a test double)
//! - [`SettingsStore`](storage::SettingsStore) - Durable key-value preferences
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Settings store |
//! | Web      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! Fallible bridge calls return [`BridgeError`](error::BridgeError). Media
//! element commands are fire-and-forget and never return errors; hosts that
//! fail to apply a command simply do not emit the confirming event.
//!
//! ## Thread Safety
//!
//! Bridge traits require [`PlatformSendSync`](platform::PlatformSendSync) so
//! that implementations can be shared behind `Arc` on native targets while
//! remaining usable from single-threaded WebAssembly hosts.
//!
//! ## Examples
//!
//! ### Implementing SettingsStore
//!
//! ```ignore
//! use bridge_traits::storage::SettingsStore;
//! use bridge_traits::error::Result;
//!
//! pub struct LocalStorageSettings { storage: web_sys::Storage }
//!
//! impl SettingsStore for LocalStorageSettings {
//!     fn get_string(&self, key: &str) -> Result<Option<String>> {
//!         // Implementation
//!         todo!()
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod logging;
pub mod media;
pub mod platform;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{LogEntry, LogLevel, LoggerSink};
pub use media::{MediaElement, MediaEvent, MediaEventHandler, MediaEventKind};
pub use storage::SettingsStore;
