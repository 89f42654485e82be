use thiserror::Error;

use crate::machine::ReviewStatus;

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("invalid review transition for span {sequence_id}: {from} -> {to}")]
    InvalidTransition {
        sequence_id: u32,
        from: ReviewStatus,
        to: ReviewStatus,
    },

    #[error("no span is awaiting review")]
    NoCurrentSpan,

    #[error("wtf score must be between 0.0 and 1.0, got {0}")]
    InvalidScore(f64),

    #[error("'{subcategory}' is not a subcategory of {category}")]
    UnknownSubcategory {
        category: String,
        subcategory: String,
    },

    /// Persisting a terminal transition failed; the span was rolled back.
    #[error("saving review of span {sequence_id} failed: {message}")]
    Sink { sequence_id: u32, message: String },
}
