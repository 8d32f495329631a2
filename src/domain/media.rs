//! Media catalog entries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Audio,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }

    /// Public listing path; detail pages live below it.
    pub fn type_path(self) -> &'static str {
        match self {
            MediaType::Video => "/videos",
            MediaType::Audio => "/audio",
        }
    }

    /// Thumbnail shown when an entry has none of its own.
    pub fn fallback_thumbnail(self) -> &'static str {
        match self {
            MediaType::Video => "/ResizerImage353X499.jpg",
            MediaType::Audio => "/story_thumb.jpg",
        }
    }
}

/// A catalog entry as stored by the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(default)]
    pub id: i64,
    pub uid: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    pub stream_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "published_by_default")]
    pub published: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn published_by_default() -> bool {
    true
}

impl MediaItem {
    /// Public detail link, e.g. `/videos/abc`.
    pub fn link(&self) -> String {
        format!("{}/{}", self.media_type.type_path(), self.uid)
    }

    pub fn thumbnail(&self) -> &str {
        match self.thumbnail_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => self.media_type.fallback_thumbnail(),
        }
    }
}
