//! Core types for playback session control

use chrono::{DateTime, Utc};
use gamma_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Playback mode of the single session slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Nothing loaded
    #[default]
    Idle,

    /// Unrestricted playback (free track, or pro member)
    PlayingFull,

    /// Time-boxed preview of a gated track for a non-member
    PlayingTrial,
}

impl SessionMode {
    /// Mode a fresh session of `track` enters for a user with the given status
    pub fn for_track(track: &Track, is_pro_member: bool) -> Self {
        if track.is_unlocked_for(is_pro_member) {
            Self::PlayingFull
        } else {
            Self::PlayingTrial
        }
    }

    /// Whether a session is active
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Monotonic token identifying one session transition
///
/// Bumped on every start, stop and mode change. Timer callbacks carry the
/// token they were armed with and are dropped when it no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(u64);

impl SessionToken {
    /// The token following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The user tapped the playing track again
    UserStopped,
    /// The user tapped a different track
    Switched,
    /// The trial window elapsed
    TrialExpired,
    /// The sleep timer elapsed
    SleepTimer,
    /// An engine call failed mid-session
    Failure,
    /// The controller is shutting down
    Shutdown,
}

/// User action delivered from the now-playing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NotificationAction {
    /// Pause the referenced track
    Pause {
        /// Track the notification was shown for
        track_id: TrackId,
    },
    /// Resume the referenced track
    Play {
        /// Track the notification was shown for
        track_id: TrackId,
    },
}

impl NotificationAction {
    /// Map a platform action identifier ("pause" / "play")
    pub fn from_action_id(action_id: &str, track_id: TrackId) -> Option<Self> {
        match action_id {
            "pause" => Some(Self::Pause { track_id }),
            "play" | "resume" => Some(Self::Play { track_id }),
            _ => None,
        }
    }

    /// Track the action refers to
    pub fn track_id(&self) -> &TrackId {
        match self {
            Self::Pause { track_id } | Self::Play { track_id } => track_id,
        }
    }
}

/// Sleep timer state as shown to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SleepTimerSnapshot {
    /// Whether the timer is enabled
    pub enabled: bool,

    /// Configured duration
    pub duration_minutes: Option<u32>,

    /// Whole minutes left, rounded up; `None` while waiting for playback to start
    pub remaining_minutes: Option<u32>,
}

/// Observable state of the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Token of the latest transition
    pub token: SessionToken,

    /// Current mode
    pub mode: SessionMode,

    /// Loaded track, if any
    pub track_id: Option<TrackId>,

    /// Whether playback is paused from the notification
    pub paused: bool,

    /// Volume applied to the current and next sessions
    pub volume: f32,

    /// Wall-clock start of the current session
    pub started_at: Option<DateTime<Utc>>,

    /// Time left in the trial window
    pub trial_remaining: Option<Duration>,

    /// Sleep timer state
    pub sleep_timer: SleepTimerSnapshot,

    /// False once notification permission was denied
    pub notifications_enabled: bool,
}

impl SessionSnapshot {
    /// Snapshot of a controller that has never played anything
    pub fn idle(volume: f32) -> Self {
        Self {
            token: SessionToken::default(),
            mode: SessionMode::Idle,
            track_id: None,
            paused: false,
            volume,
            started_at: None,
            trial_remaining: None,
            sleep_timer: SleepTimerSnapshot::default(),
            notifications_enabled: true,
        }
    }

    /// Whether `track_id` is the loaded track
    pub fn is_playing(&self, track_id: &TrackId) -> bool {
        self.track_id.as_ref() == Some(track_id)
    }
}
