/// Track and category types
use crate::types::{GroupId, TrackId};
use serde::{Deserialize, Serialize};

/// A single looping audio asset in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Name shown in the UI and in the notification
    pub display_name: String,

    /// Category this track belongs to
    pub group_id: GroupId,

    /// Asset reference handed to the audio engine
    pub asset: String,

    /// Whether playback needs an active subscription (non-subscribers get a trial)
    ///
    /// Missing values deserialize as `true`.
    #[serde(default = "default_requires_entitlement")]
    pub requires_entitlement: bool,

    /// Presentation only
    #[serde(default)]
    pub color_hint: Option<String>,

    /// Presentation only
    #[serde(default)]
    pub icon_ref: Option<String>,
}

fn default_requires_entitlement() -> bool {
    true
}

impl Track {
    /// Create a gated track with no presentation hints
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        group_id: GroupId,
        asset: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            display_name: display_name.into(),
            group_id,
            asset: asset.into(),
            requires_entitlement: true,
            color_hint: None,
            icon_ref: None,
        }
    }

    /// Mark the track as free-tier or gated
    #[must_use]
    pub fn with_entitlement(mut self, requires_entitlement: bool) -> Self {
        self.requires_entitlement = requires_entitlement;
        self
    }

    /// Attach presentation hints
    #[must_use]
    pub fn with_presentation(mut self, color: &str, icon: Option<&str>) -> Self {
        self.color_hint = Some(color.to_string());
        self.icon_ref = icon.map(str::to_string);
        self
    }

    /// Whether a user with the given subscription status may play this track without limits
    pub fn is_unlocked_for(&self, is_pro_member: bool) -> bool {
        !self.requires_entitlement || is_pro_member
    }
}

/// A titled category of tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackGroup {
    /// Group identifier
    pub id: GroupId,

    /// Group title
    pub title: String,

    /// Tracks in display order
    pub tracks: Vec<Track>,
}
