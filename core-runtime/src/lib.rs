//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the playback core:
//! - Logging and tracing infrastructure
//! - Runtime error types
//!
//! ## Overview
//!
//! Host applications call [`logging::init_logging`] once at startup. Every
//! other crate in the workspace only emits `tracing` events and never
//! installs a subscriber itself.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
