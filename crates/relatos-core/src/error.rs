//! Error taxonomy shared by the segmentation engine and its collaborators.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for segmentation operations.
pub type Result<T> = std::result::Result<T, SegmentError>;

/// Pipeline stage a per-transcript failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Segment,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Load => "load",
            Stage::Segment => "segment",
            Stage::Persist => "persist",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SegmentError {
    /// No transcript exists for the identifier.
    #[error("transcript not found: {id} ({})", path.display())]
    MissingInput { id: String, path: PathBuf },

    /// Transcript file exists but could not be read.
    #[error("failed to read transcript {id}: {source}")]
    ReadTranscript {
        id: String,
        #[source]
        source: std::io::Error,
    },

    /// Transcript file is not a valid subtitle document.
    #[error("invalid transcript document {id}: {message}")]
    InvalidTranscript { id: String, message: String },

    /// A single record was unusable and has been skipped.
    #[error("malformed segment #{index} in {transcript_id}: {reason}")]
    MalformedSegment {
        transcript_id: String,
        index: usize,
        reason: String,
    },

    /// A catalog entry is not a valid regular expression.
    #[error("pattern '{id}' does not compile: {reason}")]
    PatternCompilation { id: String, reason: String },

    /// Structural problem in a catalog document.
    #[error("invalid pattern catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid segmentation config: {0}")]
    InvalidConfig(String),
}
