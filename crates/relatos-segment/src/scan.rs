use relatos_core::{BoundaryCandidate, Transcript};

use crate::catalog::{PatternCatalog, PatternKind};
use crate::dedup::dedup_boundaries;
use crate::detect::CONTEXT_CHARS;

/// Segments read before the one being tested.
pub const SCAN_LOOKBEHIND: usize = 2;
/// Segments read from the one being tested onward.
pub const SCAN_LOOKAHEAD: usize = 5;
/// Hits closer than this to the previous one are dropped.
pub const SCAN_MIN_GAP: f64 = 30.0;

/// Per-segment scan for likely story starts, for hand analysis.
///
/// Looser than [`crate::detect_boundaries`]: every segment is tested against
/// the start patterns using the text of its neighbours, and hits are then
/// thinned at [`SCAN_MIN_GAP`] instead of the configured gap.
pub fn scan_story_starts(transcript: &Transcript, catalog: &PatternCatalog) -> Vec<BoundaryCandidate> {
    let segments = &transcript.segments;
    let mut hits = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        let from = i.saturating_sub(SCAN_LOOKBEHIND);
        let to = (i + SCAN_LOOKAHEAD).min(segments.len());
        let context = segments[from..to]
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if let Some(pattern) = catalog.first_match(PatternKind::Start, &context) {
            hits.push(BoundaryCandidate {
                time: seg.start,
                pattern_id: pattern.id.clone(),
                context: context.chars().take(CONTEXT_CHARS).collect(),
            });
        }
    }
    dedup_boundaries(hits, SCAN_MIN_GAP)
}
