use crate::error::Result;
use crate::types::Transcript;

/// Supplies transcripts by identifier.
///
/// Implementations return [`crate::SegmentError::MissingInput`] when the
/// identifier is unknown, and skip (rather than fail on) individual
/// malformed records.
pub trait TranscriptSource {
    fn load(&self, id: &str) -> Result<Transcript>;
}
