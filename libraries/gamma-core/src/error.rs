/// Core error types for Gamma Noise
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `GammaError`
pub type Result<T> = std::result::Result<T, GammaError>;

/// Core error type shared by every collaborator boundary
#[derive(Error, Debug)]
pub enum GammaError {
    /// The audio asset for a track could not be found
    #[error("Audio asset missing for track: {0}")]
    AssetMissing(TrackId),

    /// The audio engine rejected an operation
    #[error("Audio engine rejected operation: {0}")]
    EngineRejected(String),

    /// The user denied notification permission
    #[error("Notification permission denied")]
    PermissionDenied,

    /// Any other notification failure
    #[error("Notification error: {0}")]
    Notification(String),

    /// Persistent storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl GammaError {
    /// Create an engine rejection error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::EngineRejected(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error means notifications cannot be shown at all
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}
