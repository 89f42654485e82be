use relatos_core::{BoundaryCandidate, SegmentationConfig, StorySpan, TimedSegment};

/// Turn ordered, deduplicated boundaries into closed spans.
///
/// A span runs to the next boundary, or `default_duration` past its start
/// for the last one. A span longer than `max_duration` is cut back to
/// `default_duration` (not to `max_duration`).
pub fn build_spans(
    boundaries: &[BoundaryCandidate],
    segments: &[TimedSegment],
    config: &SegmentationConfig,
) -> Vec<StorySpan> {
    let mut spans = Vec::with_capacity(boundaries.len());
    for (i, boundary) in boundaries.iter().enumerate() {
        let start = boundary.time;
        let mut end = match boundaries.get(i + 1) {
            Some(next) => next.time,
            None => start + config.default_duration,
        };
        if end - start > config.max_duration {
            end = start + config.default_duration;
        }
        spans.push(StorySpan {
            sequence_id: (i + 1) as u32,
            start,
            end,
            duration: end - start,
            matched_pattern: boundary.pattern_id.clone(),
            text: extract_text(segments, start, end),
            classification: None,
        });
    }
    spans
}

/// Space-join the text of every segment with `start` in `[start, end)`.
/// Relies on `segments` being ordered by start.
pub fn extract_text(segments: &[TimedSegment], start: f64, end: f64) -> String {
    let first = segments.partition_point(|s| s.start < start);
    segments[first..]
        .iter()
        .take_while(|s| s.start < end)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
