pub mod config;
pub mod error;
pub mod source;
pub mod taxonomy;
pub mod timefmt;
pub mod types;

pub use config::{ReclassifyPolicy, SegmentationConfig};
pub use error::{Result, SegmentError, Stage};
pub use source::TranscriptSource;
pub use taxonomy::{Category, Narrator};
pub use types::*;
