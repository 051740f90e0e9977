//! # Playback Error Types
//!
//! Errors surfaced while configuring the synchronization core.
//!
//! Reconciliation itself never fails: a missing element turns commands into
//! no-ops and store failures fall back to defaults. Only construction-time
//! mistakes are reported through [`PlaybackError`].

use thiserror::Error;

/// Errors that can occur while building a synchronization core.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f64),

    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
