/// ID types for Gamma Noise entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier, stable and unique within a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an ID from a display name ("40hz Binaural Beats" -> "40hz-binaural-beats")
    pub fn from_display_name(name: &str) -> Self {
        Self(slugify(name))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Category (group) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Create a new group ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an ID from a group title
    pub fn from_title(title: &str) -> Self {
        Self(slugify(title))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_id_from_display_name() {
        assert_eq!(TrackId::from_display_name("White Noise").as_str(), "white-noise");
        assert_eq!(
            TrackId::from_display_name("40hz Binaural Beats").as_str(),
            "40hz-binaural-beats"
        );
    }

    #[test]
    fn slug_collapses_punctuation_runs() {
        assert_eq!(
            GroupId::from_title("Sleep Aid & Anxiety").as_str(),
            "sleep-aid-anxiety"
        );
        assert_eq!(GroupId::from_title("  Focus!! ").as_str(), "focus");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&TrackId::new("pink-noise")).unwrap();
        assert_eq!(json, "\"pink-noise\"");
    }
}
