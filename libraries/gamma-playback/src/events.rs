//! Controller Events
//!
//! Event-based communication for UI and notification synchronization.
//! The latest full state is published separately as a `SessionSnapshot`;
//! events describe what happened between snapshots:
//! - Session lifecycle (started, ended, paused, resumed, upgraded)
//! - The paywall prompt after a trial runs out
//! - Volume and sleep timer changes
//! - Failures that were absorbed by rolling back to idle

use crate::types::{SessionMode, SessionToken, StopReason};
use gamma_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// A track started playing
    SessionStarted {
        /// Track now playing
        track_id: TrackId,
        /// Full or trial
        mode: SessionMode,
        /// Token of the new session
        token: SessionToken,
    },

    /// The active session ended and the controller is idle
    SessionEnded {
        /// Track that was playing
        track_id: TrackId,
        /// Why it ended
        reason: StopReason,
    },

    /// A trial session was converted to full playback after a purchase
    SessionUpgraded {
        /// Track now playing without limits
        track_id: TrackId,
    },

    /// A subscription lapsed while a gated track played in full; a new trial window started
    SessionDowngraded {
        /// Track now playing as a preview
        track_id: TrackId,
    },

    /// Playback paused from the notification
    Paused {
        /// Paused track
        track_id: TrackId,
    },

    /// Playback resumed from the notification
    Resumed {
        /// Resumed track
        track_id: TrackId,
    },

    /// The trial window elapsed; the UI should show the paywall
    ///
    /// Emitted at most once per trial session, and only on natural expiry.
    PaywallRequested {
        /// Track whose preview ran out
        track_id: TrackId,
    },

    /// Volume changed
    VolumeChanged {
        /// New level (0.0 - 1.0)
        volume: f32,
    },

    /// Sleep timer enabled, disabled or fired
    SleepTimerChanged {
        /// Whether the timer is enabled now
        enabled: bool,
        /// Configured duration when enabled
        duration_minutes: Option<u32>,
    },

    /// A track could not be started or an engine call failed mid-session
    PlaybackFailed {
        /// Affected track
        track_id: TrackId,
        /// Error message
        message: String,
    },

    /// Notification permission is missing; playback continues without one
    NotificationsUnavailable,
}

impl ControllerEvent {
    /// Track the event refers to, if any
    pub fn track_id(&self) -> Option<&TrackId> {
        match self {
            Self::SessionStarted { track_id, .. }
            | Self::SessionEnded { track_id, .. }
            | Self::SessionUpgraded { track_id }
            | Self::SessionDowngraded { track_id }
            | Self::Paused { track_id }
            | Self::Resumed { track_id }
            | Self::PaywallRequested { track_id }
            | Self::PlaybackFailed { track_id, .. } => Some(track_id),
            Self::VolumeChanged { .. }
            | Self::SleepTimerChanged { .. }
            | Self::NotificationsUnavailable => None,
        }
    }
}
