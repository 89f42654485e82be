use relatos_core::BoundaryCandidate;

/// Forward greedy filter: keep a candidate only if it is more than
/// `min_gap` seconds after the last kept one. The first candidate of a
/// cluster wins regardless of which pattern the later ones matched.
pub fn dedup_boundaries(candidates: Vec<BoundaryCandidate>, min_gap: f64) -> Vec<BoundaryCandidate> {
    let mut kept = Vec::with_capacity(candidates.len());
    let mut last_accepted = -2.0 * min_gap;
    for candidate in candidates {
        if candidate.time - last_accepted > min_gap {
            last_accepted = candidate.time;
            kept.push(candidate);
        } else {
            tracing::debug!(
                time = candidate.time,
                pattern = %candidate.pattern_id,
                last_accepted,
                "boundary dropped as duplicate"
            );
        }
    }
    kept
}
