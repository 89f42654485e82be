use relatos_core::BoundaryCandidate;

use crate::catalog::{PatternCatalog, PatternKind};
use crate::window::WindowIndex;

/// Maximum characters of window text kept as candidate context.
pub const CONTEXT_CHARS: usize = 200;

/// Emit at most one candidate per window, in ascending window order.
///
/// The candidate time is the first segment's start in the window and the
/// reported pattern is the first start-indicator (catalog order) contained
/// anywhere in the window's combined text.
pub fn detect_boundaries(index: &WindowIndex<'_>, catalog: &PatternCatalog) -> Vec<BoundaryCandidate> {
    let mut candidates = Vec::new();
    for window in index.iter() {
        let text = window.combined_text();
        if let Some(pattern) = catalog.first_match(PatternKind::Start, &text) {
            tracing::trace!(window = window.index, pattern = %pattern.id, "boundary candidate");
            candidates.push(BoundaryCandidate {
                time: window.first_start(),
                pattern_id: pattern.id.clone(),
                context: text.chars().take(CONTEXT_CHARS).collect(),
            });
        }
    }
    candidates
}
