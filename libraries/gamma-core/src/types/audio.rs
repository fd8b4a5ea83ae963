/// Audio-related types
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a track loaded by an `AudioEngine`
///
/// Handles are minted by the engine; the controller only compares and passes them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioHandle(pub u64);

impl AudioHandle {
    /// Create a handle from an engine-specific raw value
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Global audio session behaviour, applied once when the player starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioMode {
    /// Keep playing while the app is in the background
    #[serde(default = "default_true")]
    pub allow_background: bool,

    /// Lower other apps' audio instead of mixing at full level
    #[serde(default)]
    pub duck_others: bool,

    /// Play even when the device's silent switch is on
    #[serde(default = "default_true")]
    pub silent_mode_override: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            allow_background: true,
            duck_others: false,
            silent_mode_override: true,
        }
    }
}
