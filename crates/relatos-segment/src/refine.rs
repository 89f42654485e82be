use relatos_core::{StorySpan, TimedSegment};

use crate::catalog::{PatternCatalog, PatternKind};
use crate::span::extract_text;
use crate::window::WindowIndex;

/// Pull span ends in to the first closing phrase heard after the opening window.
///
/// Only windows after the one holding the span start are considered, and only
/// those whose first segment lies inside the span. The new end is the end of
/// the matching window's last segment, kept within `(start, end]`. Spans
/// without a closing phrase are untouched.
pub fn refine_span_ends(
    spans: &mut [StorySpan],
    segments: &[TimedSegment],
    index: &WindowIndex<'_>,
    catalog: &PatternCatalog,
) {
    for span in spans.iter_mut() {
        let start_window = index.index_of(span.start);
        let closing = index
            .after(start_window)
            .take_while(|w| w.first_start() < span.end)
            .find(|w| catalog.first_match(PatternKind::End, &w.combined_text()).is_some());
        let Some(window) = closing else {
            continue;
        };
        let new_end = window.last_end().min(span.end);
        if new_end <= span.start || new_end >= span.end {
            continue;
        }
        tracing::debug!(
            sequence_id = span.sequence_id,
            old_end = span.end,
            new_end,
            "span end refined by closing phrase"
        );
        span.end = new_end;
        span.duration = new_end - span.start;
        span.text = extract_text(segments, span.start, new_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::index_windows;

    fn span(start: f64, end: f64) -> StorySpan {
        StorySpan {
            sequence_id: 1,
            start,
            end,
            duration: end - start,
            matched_pattern: "writes-to-me".into(),
            text: String::new(),
            classification: None,
        }
    }

    #[test]
    fn end_moves_to_closing_window() {
        let segments = vec![
            TimedSegment::new(0.0, 5.0, "me escribe juan"),
            TimedSegment::new(40.0, 5.0, "y vi una luz"),
            TimedSegment::new(95.0, 5.0, "gracias por compartir"),
            TimedSegment::new(200.0, 5.0, "otra cosa"),
        ];
        let idx = index_windows(&segments, 30.0);
        let mut spans = vec![span(0.0, 600.0)];
        refine_span_ends(&mut spans, &segments, &idx, &PatternCatalog::builtin());
        assert_eq!(spans[0].end, 100.0);
        assert_eq!(spans[0].duration, 100.0);
        assert_eq!(spans[0].text, "me escribe juan y vi una luz gracias por compartir");
    }

    #[test]
    fn closing_in_opening_window_is_ignored() {
        let segments = vec![
            TimedSegment::new(0.0, 5.0, "un abrazo, me escribe juan"),
            TimedSegment::new(40.0, 5.0, "y vi una luz"),
        ];
        let idx = index_windows(&segments, 30.0);
        let mut spans = vec![span(0.0, 600.0)];
        refine_span_ends(&mut spans, &segments, &idx, &PatternCatalog::builtin());
        assert_eq!(spans[0].end, 600.0);
    }

    #[test]
    fn closing_beyond_span_is_ignored() {
        let segments = vec![
            TimedSegment::new(0.0, 5.0, "me escribe juan"),
            TimedSegment::new(130.0, 5.0, "chao"),
        ];
        let idx = index_windows(&segments, 30.0);
        let mut spans = vec![span(0.0, 120.0)];
        refine_span_ends(&mut spans, &segments, &idx, &PatternCatalog::builtin());
        assert_eq!(spans[0].end, 120.0);
    }
}
