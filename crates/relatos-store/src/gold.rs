use anyhow::Context;
use relatos_core::{Classification, StorySpan};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{lock_file, write_atomic};

/// One human-confirmed story, kept for training and evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoldEntry {
    pub video_id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(flatten)]
    pub classification: Classification,
}

impl GoldEntry {
    /// Build an entry from a span with a verified story classification.
    pub fn from_span(video_id: &str, span: &StorySpan) -> Option<Self> {
        let classification = span.classification.as_ref()?;
        if !(classification.human_verified && classification.is_story) {
            return None;
        }
        Some(Self {
            video_id: video_id.to_string(),
            start: span.start,
            end: span.end,
            text: span.text.clone(),
            classification: classification.clone(),
        })
    }

    fn same_story(&self, other: &GoldEntry) -> bool {
        self.video_id == other.video_id && (self.start - other.start).abs() < 0.05
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoldDataset {
    pub entries: Vec<GoldEntry>,
}

impl GoldDataset {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading gold dataset: {}", path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("parsing gold dataset: {}", path.display()))?;
        Ok(Self { entries })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(path, data.as_bytes())
            .with_context(|| format!("saving gold dataset: {}", path.display()))
    }

    /// Load, change and save under the data-dir lock.
    pub fn update<T>(
        path: &Path,
        lock_path: &Path,
        change: impl FnOnce(&mut Self) -> T,
    ) -> anyhow::Result<T> {
        let _lock = lock_file(lock_path)?;
        let mut gold = Self::load(path)?;
        let out = change(&mut gold);
        gold.save(path)?;
        Ok(out)
    }

    /// Insert or replace the entry for `(video_id, start)`. Returns true if new.
    pub fn upsert(&mut self, entry: GoldEntry) -> bool {
        match self.entries.iter_mut().find(|e| e.same_story(&entry)) {
            Some(existing) => {
                *existing = entry;
                false
            }
            None => {
                self.entries.push(entry);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
