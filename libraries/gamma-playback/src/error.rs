//! Error types for playback session control

use gamma_core::TrackId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio engine could not load the track; the controller is idle
    #[error("Failed to load track {track_id}: {reason}")]
    LoadFailed {
        /// Track that failed to load
        track_id: TrackId,
        /// Engine-provided reason
        reason: String,
    },

    /// A play/pause/volume call failed and the session was rolled back to idle
    #[error("Audio engine error: {0}")]
    Audio(String),

    /// Track id not present in the catalog
    #[error("Unknown track: {0}")]
    UnknownTrack(TrackId),

    /// Sleep timer duration outside the configured range or step
    #[error("Invalid sleep timer duration: {0} minutes")]
    InvalidSleepDuration(u32),

    /// Volume is not a finite number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// The controller task has shut down
    #[error("Playback controller is closed")]
    ControllerClosed,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
