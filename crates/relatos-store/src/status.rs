use anyhow::Context;
use relatos_core::timefmt::now_rfc3339;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{lock_file, write_atomic};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    #[default]
    Pending,
    InProgress,
    Completed,
    Error,
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageState::Pending => "pending",
            StageState::InProgress => "in_progress",
            StageState::Completed => "completed",
            StageState::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stages {
    #[serde(default)]
    pub subtitles: StageState,
    #[serde(default)]
    pub segmentation: StageState,
    #[serde(default)]
    pub review: StageState,
    #[serde(default)]
    pub export: StageState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoMetrics {
    #[serde(default)]
    pub detected: usize,
    #[serde(default)]
    pub reviewed: usize,
    #[serde(default)]
    pub pending: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoTimestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmented_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoStatus {
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_date: Option<String>,
    #[serde(default)]
    pub stages: Stages,
    #[serde(default)]
    pub metrics: VideoMetrics,
    #[serde(default)]
    pub timestamps: VideoTimestamps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalSummary {
    pub total_videos: usize,
    pub total_detected: usize,
    pub total_reviewed: usize,
}

/// `pipeline_status.json`: where every video stands in the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub videos: Vec<VideoStatus>,
    #[serde(default)]
    pub summary: GlobalSummary,
}

impl PipelineStatus {
    /// Load from disk; a missing file is an empty status.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading status: {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing status: {}", path.display()))
    }

    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        self.refresh_summary();
        self.updated_at = Some(now_rfc3339());
        let data = serde_json::to_string_pretty(self)?;
        write_atomic(path, data.as_bytes()).with_context(|| format!("saving status: {}", path.display()))
    }

    /// Load, change and save under the data-dir lock, so concurrent runs
    /// never overwrite each other's records.
    pub fn update<T>(
        path: &Path,
        lock_path: &Path,
        change: impl FnOnce(&mut Self) -> T,
    ) -> anyhow::Result<T> {
        let _lock = lock_file(lock_path)?;
        let mut status = Self::load(path)?;
        let out = change(&mut status);
        status.save(path)?;
        Ok(out)
    }

    pub fn video(&self, video_id: &str) -> Option<&VideoStatus> {
        self.videos.iter().find(|v| v.video_id == video_id)
    }

    /// The entry for `video_id`, created (all stages pending) if absent.
    pub fn video_mut(&mut self, video_id: &str) -> &mut VideoStatus {
        let pos = match self.videos.iter().position(|v| v.video_id == video_id) {
            Some(pos) => pos,
            None => {
                self.videos.push(VideoStatus {
                    video_id: video_id.to_string(),
                    ..VideoStatus::default()
                });
                self.videos.len() - 1
            }
        };
        &mut self.videos[pos]
    }

    pub fn record_segmentation(&mut self, video_id: &str, detected: usize, reviewed: usize) {
        let video = self.video_mut(video_id);
        video.stages.subtitles = StageState::Completed;
        video.stages.segmentation = StageState::Completed;
        video.metrics.detected = detected;
        video.metrics.reviewed = reviewed;
        video.metrics.pending = detected.saturating_sub(reviewed);
        video.stages.review = review_state(detected, reviewed);
        video.timestamps.segmented_at = Some(now_rfc3339());
        video.last_error = None;
    }

    pub fn record_segmentation_error(&mut self, video_id: &str, message: &str) {
        let video = self.video_mut(video_id);
        video.stages.segmentation = StageState::Error;
        video.last_error = Some(message.to_string());
    }

    pub fn record_review(&mut self, video_id: &str, reviewed: usize, total: usize) {
        let video = self.video_mut(video_id);
        video.metrics.detected = total;
        video.metrics.reviewed = reviewed;
        video.metrics.pending = total.saturating_sub(reviewed);
        video.stages.review = review_state(total, reviewed);
        video.timestamps.last_review_at = Some(now_rfc3339());
    }

    pub fn record_export(&mut self) {
        let now = now_rfc3339();
        for video in &mut self.videos {
            video.stages.export = StageState::Completed;
            video.timestamps.exported_at = Some(now.clone());
        }
    }

    pub fn refresh_summary(&mut self) {
        self.summary = GlobalSummary {
            total_videos: self.videos.len(),
            total_detected: self.videos.iter().map(|v| v.metrics.detected).sum(),
            total_reviewed: self.videos.iter().map(|v| v.metrics.reviewed).sum(),
        };
    }
}

fn review_state(total: usize, reviewed: usize) -> StageState {
    if total > 0 && reviewed >= total {
        StageState::Completed
    } else if reviewed > 0 {
        StageState::InProgress
    } else {
        StageState::Pending
    }
}
