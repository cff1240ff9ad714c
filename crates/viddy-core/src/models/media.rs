//! Video-service records that can be pinned or shared into the app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A published video.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    /// May be empty or whitespace when the uploader left it blank.
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

impl Video {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the title would render as nothing.
    pub fn is_untitled(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// A channel videos can be posted to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Channel {
    pub fn new(channel_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            ..Self::default()
        }
    }
}

/// A file handed to the app by the share sheet or a file picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    pub path: PathBuf,
    /// MIME type as reported by the platform, e.g. `video/mp4`.
    pub content_type: String,
}

impl SharedFile {
    pub fn new(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.to_lowercase().contains("image")
    }
}
