//! Session volume
//!
//! Linear 0.0-1.0, handed to the engine as-is. The level belongs to the
//! controller rather than the track, so it carries over when tracks change.

use crate::error::{PlaybackError, Result};

/// Volume level shared by every session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Create a volume, clamping into range
    pub fn new(level: f32) -> Self {
        Self {
            level: if level.is_finite() {
                level.clamp(0.0, 1.0)
            } else {
                1.0
            },
        }
    }

    /// Set the level, clamping into range
    ///
    /// # Errors
    /// `PlaybackError::InvalidVolume` for NaN or infinite input
    pub fn set_level(&mut self, level: f32) -> Result<f32> {
        if !level.is_finite() {
            return Err(PlaybackError::InvalidVolume(level));
        }
        self.level = level.clamp(0.0, 1.0);
        Ok(self.level)
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Whether the level is zero
    pub fn is_silent(&self) -> bool {
        self.level == 0.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}
