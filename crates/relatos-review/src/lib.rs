//! Human supervision of candidate spans.
//!
//! Each span moves through [`ReviewStatus`] under reviewer commands; every
//! terminal transition (confirmed or discarded) is handed to a
//! [`ReviewSink`] immediately, so quitting mid-session loses nothing.

mod draft;
mod error;
mod machine;
mod session;

pub use draft::{
    suggest_summary, suggest_title, validate_score, ClassificationDraft, SUMMARY_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use error::{Result, ReviewError};
pub use machine::{is_valid_transition, ReviewStatus};
pub use session::{ReviewCommand, ReviewSession, ReviewSink, ReviewSummary, SessionState};
