use relatos_core::{SegmentationResult, StorySpan};
use relatos_review::ReviewSink;
use std::path::PathBuf;

use crate::gold::{GoldDataset, GoldEntry};
use crate::results::ResultStore;

/// Persists each reviewed span: rewrites the segmentation file and, for
/// confirmed stories, upserts the gold dataset.
pub struct FileReviewSink {
    results: ResultStore,
    gold_path: PathBuf,
    gold_added: usize,
}

impl FileReviewSink {
    pub fn new(results: ResultStore, gold_path: impl Into<PathBuf>) -> Self {
        Self {
            results,
            gold_path: gold_path.into(),
            gold_added: 0,
        }
    }

    /// Gold entries added (not replaced) by this sink.
    pub fn gold_added(&self) -> usize {
        self.gold_added
    }
}

impl ReviewSink for FileReviewSink {
    fn span_reviewed(&mut self, result: &SegmentationResult, span: &StorySpan) -> anyhow::Result<()> {
        self.results.save(result)?;
        if let Some(entry) = GoldEntry::from_span(&result.transcript_id, span) {
            if GoldDataset::update(&self.gold_path, self.results.lock_path(), |g| g.upsert(entry))? {
                self.gold_added += 1;
            }
        }
        tracing::debug!(
            id = %result.transcript_id,
            sequence_id = span.sequence_id,
            "review persisted"
        );
        Ok(())
    }
}
