use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extract the video id from a YouTube URL.
///
/// Handles `watch?v=<id>` and `youtu.be/<id>` forms; anything else is
/// returned unchanged so bare ids pass through.
pub fn extract_video_id(url: &str) -> String {
    if let Some((_, rest)) = url.split_once("v=") {
        return rest.split('&').next().unwrap_or(rest).to_string();
    }
    if let Some((_, rest)) = url.split_once("youtu.be/") {
        return rest.split('?').next().unwrap_or(rest).to_string();
    }
    url.to_string()
}

/// An entry of `videos_input.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoEntry {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "fecha", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl VideoEntry {
    /// Explicit id, else the id parsed from the URL.
    pub fn resolved_id(&self) -> Option<String> {
        match self.video_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => {
                let url = self.url.trim();
                (!url.is_empty()).then(|| extract_video_id(url))
            }
        }
    }
}

/// `videos_input.json`: the list of episodes to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideosInput {
    #[serde(default)]
    pub videos: Vec<VideoEntry>,
}

impl VideosInput {
    /// Load the list; a missing file is an empty list.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolved ids in file order; entries without one are skipped.
    pub fn ids(&self) -> Vec<String> {
        self.videos.iter().filter_map(VideoEntry::resolved_id).collect()
    }

    pub fn find(&self, video_id: &str) -> Option<&VideoEntry> {
        self.videos
            .iter()
            .find(|v| v.resolved_id().as_deref() == Some(video_id))
    }
}
