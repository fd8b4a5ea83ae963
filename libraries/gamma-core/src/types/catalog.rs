//! Static track catalog
//!
//! The catalog is immutable once built. Track ids are unique across all groups.
//! Besides the bundled catalog, entries exported by the legacy app can be
//! migrated with an explicit choice of how their `proAccess` flag is read.

use crate::error::{GammaError, Result};
use crate::types::{GroupId, Track, TrackGroup, TrackId};
use serde::Deserialize;
use std::collections::HashMap;

/// How a legacy `proAccess` flag should be interpreted during migration
///
/// The legacy data uses the flag with both meanings. Missing flags always
/// migrate to `requires_entitlement = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyPolarity {
    /// `proAccess: true` marks a free-tier track
    ProAccessMeansFree,
    /// `proAccess: true` marks a subscriber-only track
    ProAccessMeansGated,
}

impl LegacyPolarity {
    fn requires_entitlement(self, pro_access: Option<bool>) -> bool {
        match (self, pro_access) {
            (_, None) => true,
            (Self::ProAccessMeansFree, Some(flag)) => !flag,
            (Self::ProAccessMeansGated, Some(flag)) => flag,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyGroup {
    title: String,
    noises: Vec<LegacyNoise>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyNoise {
    name: String,
    color: String,
    sound_file: Option<String>,
    icon: Option<String>,
    icon_family: Option<String>,
    pro_access: Option<bool>,
}

/// Immutable catalog of tracks grouped into categories
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<TrackGroup>,
    /// (group index, track index) by track id
    index: HashMap<TrackId, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate track ids
    pub fn new(groups: Vec<TrackGroup>) -> Result<Self> {
        let mut index = HashMap::new();
        for (g, group) in groups.iter().enumerate() {
            for (t, track) in group.tracks.iter().enumerate() {
                if index.insert(track.id.clone(), (g, t)).is_some() {
                    return Err(GammaError::invalid_input(format!(
                        "duplicate track id in catalog: {}",
                        track.id
                    )));
                }
            }
        }
        Ok(Self { groups, index })
    }

    /// Parse a catalog in the native JSON format (a list of `TrackGroup`)
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<TrackGroup> = serde_json::from_str(json)?;
        Self::new(groups)
    }

    /// Migrate a legacy catalog export
    ///
    /// Entries without a sound file cannot be played and are dropped. Ids are
    /// derived from names and titles.
    pub fn from_legacy_json(json: &str, polarity: LegacyPolarity) -> Result<Self> {
        let legacy: Vec<LegacyGroup> = serde_json::from_str(json)?;

        let groups = legacy
            .into_iter()
            .map(|group| {
                let group_id = GroupId::from_title(&group.title);
                let tracks = group
                    .noises
                    .into_iter()
                    .filter_map(|noise| {
                        let asset = noise.sound_file?;
                        let icon_ref = match (noise.icon_family, noise.icon) {
                            (Some(family), Some(icon)) => Some(format!("{}:{}", family, icon)),
                            (None, Some(icon)) => Some(icon),
                            _ => None,
                        };
                        Some(Track {
                            id: TrackId::from_display_name(&noise.name),
                            display_name: noise.name,
                            group_id: group_id.clone(),
                            asset,
                            requires_entitlement: polarity.requires_entitlement(noise.pro_access),
                            color_hint: Some(noise.color),
                            icon_ref,
                        })
                    })
                    .collect();
                TrackGroup {
                    id: group_id,
                    title: group.title,
                    tracks,
                }
            })
            .collect();

        Self::new(groups)
    }

    /// The catalog shipped with the app
    ///
    /// # Errors
    ///
    /// Returns `GammaError::InvalidInput` if the bundled groups repeat a track id
    pub fn bundled() -> Result<Self> {
        let sleep = GroupId::new("sleep-aid-anxiety");
        let stress = GroupId::new("stress-management");
        let tinnitus = GroupId::new("tinnitus-relief");
        let focus = GroupId::new("focus-productivity");

        let groups = vec![
            TrackGroup {
                id: sleep.clone(),
                title: "Sleep Aid & Anxiety".to_string(),
                tracks: vec![
                    Track::new("white-noise", "White Noise", sleep.clone(), "white.mp3")
                        .with_entitlement(false)
                        .with_presentation("#FFFFFF", None),
                    Track::new("pink-noise", "Pink Noise", sleep.clone(), "pink.mp3")
                        .with_entitlement(false)
                        .with_presentation("#FFB6C1", None),
                    Track::new("brown-noise", "Brown Noise", sleep, "brown.mp3")
                        .with_entitlement(false)
                        .with_presentation("#AB4B07", None),
                ],
            },
            TrackGroup {
                id: stress.clone(),
                title: "Stress Management".to_string(),
                tracks: vec![
                    Track::new("green-noise", "Green Noise", stress.clone(), "green.mp3")
                        .with_presentation("#00FF00", None),
                    Track::new(
                        "nature-sound",
                        "Nature Sound",
                        stress.clone(),
                        "stress-nature.mp3",
                    )
                    .with_presentation("#FFFFFF", Some("Ionicons:leaf")),
                    Track::new(
                        "relaxing-noise",
                        "Relaxing Noise",
                        stress,
                        "stress-relaxing.mp3",
                    )
                    .with_presentation("#FFFFFF", Some("MaterialCommunityIcons:bee-flower")),
                ],
            },
            TrackGroup {
                id: tinnitus.clone(),
                title: "Tinnitus Relief".to_string(),
                tracks: vec![
                    Track::new("blue-noise", "Blue Noise", tinnitus.clone(), "blue.mp3")
                        .with_presentation("#0000FF", None),
                    Track::new("purple-noise", "Purple Noise", tinnitus.clone(), "purple.mp3")
                        .with_presentation("#9400D3", None),
                    Track::new(
                        "tinnitus-noise",
                        "Tinnitus Noise",
                        tinnitus,
                        "tinnitus-silk.mp3",
                    )
                    .with_presentation("#FFFFFF", Some("FontAwesome6:ear-listen")),
                ],
            },
            TrackGroup {
                id: focus.clone(),
                title: "Focus & Productivity".to_string(),
                tracks: vec![
                    Track::new(
                        "40hz-binaural-beats",
                        "40hz Binaural Beats",
                        focus.clone(),
                        "focus-40hz.mp3",
                    )
                    .with_presentation("#FFFFFF", Some("FontAwesome5:hand-holding-water")),
                    Track::new(
                        "focus-memory-sound",
                        "Focus & Memory Sound",
                        focus.clone(),
                        "focus-quantum.mp3",
                    )
                    .with_presentation("#FFFFFF", Some("FontAwesome5:brain")),
                    Track::new(
                        "universe-sound",
                        "Universe Sound",
                        focus,
                        "focus-universe.mp3",
                    )
                    .with_presentation("#FFFFFF", Some("FontAwesome5:cloud")),
                ],
            },
        ];

        Self::new(groups)
    }

    /// Look up a track by id
    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.index
            .get(id)
            .map(|&(g, t)| &self.groups[g].tracks[t])
    }

    /// Groups in display order
    pub fn groups(&self) -> &[TrackGroup] {
        &self.groups
    }

    /// All tracks in display order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.groups.iter().flat_map(|group| group.tracks.iter())
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the catalog has no tracks
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
