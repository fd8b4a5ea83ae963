/// "Now playing" notification payloads
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Which flavour of the now-playing notification to present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    /// Unrestricted playback
    Full,
    /// Time-boxed preview of a gated track
    Trial,
    /// Playback paused from the notification
    Paused,
}

/// Content of the single sticky now-playing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlayingNotification {
    /// Notification title
    pub title: String,

    /// Notification body (the track's display name)
    pub body: String,

    /// Track the notification refers to, echoed back with user actions
    pub track_id: TrackId,

    /// Whether the notification stays until dismissed
    pub sticky: bool,

    /// Presentation variant
    pub variant: NotificationVariant,
}
