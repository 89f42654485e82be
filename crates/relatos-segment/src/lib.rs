//! Heuristic story segmentation.
//!
//! Transcript → windows → boundary candidates → deduplicated boundaries →
//! spans. Every stage is a pure function of its input plus the
//! [`PatternCatalog`] and [`SegmentationConfig`]; [`Segmenter`] bundles the
//! two so callers never reach for process-wide state.

pub mod batch;
pub mod catalog;
pub mod dedup;
pub mod detect;
pub mod refine;
pub mod scan;
pub mod span;
pub mod window;

pub use batch::{segment_batch, BatchOutcome, BatchReport};
pub use catalog::{CatalogPattern, PatternCatalog, PatternKind, PatternSpec};
pub use dedup::dedup_boundaries;
pub use detect::detect_boundaries;
pub use refine::refine_span_ends;
pub use scan::{scan_story_starts, SCAN_MIN_GAP};
pub use span::{build_spans, extract_text};
pub use window::{index_windows, Window, WindowIndex};

use relatos_core::timefmt::format_rfc3339;
use relatos_core::{
    Result, SegmentError, SegmentationConfig, SegmentationResult, Transcript,
    METHOD_HEURISTICS_V1,
};
use time::OffsetDateTime;

/// Run the full pipeline over one transcript.
///
/// Segments must already be ordered by start. An empty transcript yields a
/// result with no spans.
pub fn segment_transcript(
    transcript: &Transcript,
    catalog: &PatternCatalog,
    config: &SegmentationConfig,
    generated_at: OffsetDateTime,
) -> SegmentationResult {
    let index = index_windows(&transcript.segments, config.window_size);
    let candidates = detect_boundaries(&index, catalog);
    let raw = candidates.len();
    let boundaries = dedup_boundaries(candidates, config.min_gap);
    let mut spans = build_spans(&boundaries, &transcript.segments, config);
    if config.refine_with_end_patterns {
        refine_span_ends(&mut spans, &transcript.segments, &index, catalog);
    }

    tracing::info!(
        id = %transcript.id,
        segments = transcript.len(),
        windows = index.len(),
        candidates = raw,
        spans = spans.len(),
        "transcript segmented"
    );

    SegmentationResult {
        transcript_id: transcript.id.clone(),
        generated_at: format_rfc3339(generated_at),
        method: METHOD_HEURISTICS_V1.to_string(),
        catalog_digest: catalog.digest(),
        config: config.clone(),
        total_spans: spans.len(),
        spans,
    }
}

/// A validated catalog + config pair.
#[derive(Debug, Clone)]
pub struct Segmenter {
    catalog: PatternCatalog,
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(catalog: PatternCatalog, config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment `transcript`, stamped with the current UTC time.
    ///
    /// Rejects transcripts whose segments are not ordered by start rather
    /// than producing spans from a misordered timeline.
    pub fn run(&self, transcript: &Transcript) -> Result<SegmentationResult> {
        self.run_at(transcript, OffsetDateTime::now_utc())
    }

    pub fn run_at(
        &self,
        transcript: &Transcript,
        generated_at: OffsetDateTime,
    ) -> Result<SegmentationResult> {
        if let Some(pos) = transcript
            .segments
            .windows(2)
            .position(|pair| pair[1].start < pair[0].start)
        {
            return Err(SegmentError::InvalidTranscript {
                id: transcript.id.clone(),
                message: format!("segment #{} starts before its predecessor", pos + 1),
            });
        }
        Ok(segment_transcript(
            transcript,
            &self.catalog,
            &self.config,
            generated_at,
        ))
    }
}
