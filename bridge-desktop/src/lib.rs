//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `SettingsStore` using a JSON file in the user's config directory
//!
//! Media elements are always supplied by the host UI toolkit, so this crate
//! does not ship one.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::JsonSettingsStore;
//! use std::sync::Arc;
//!
//! let path = JsonSettingsStore::default_path("my-player")?;
//! let store = Arc::new(JsonSettingsStore::open(path)?);
//!
//! // Hand `store` to the playback core configuration
//! ```

mod settings;

pub use settings::JsonSettingsStore;
