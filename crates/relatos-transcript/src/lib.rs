mod analyze;
mod source;
mod subtitle;
mod video;

pub use analyze::{chunk_transcript, render_report, Chunk, ReportFormat, DEFAULT_CHUNK_SECONDS};
pub use source::FsTranscriptSource;
pub use subtitle::{classify_record, parse_subtitles, ParsedTranscript, RecordAction, SubtitleFile};
pub use video::{extract_video_id, VideoEntry, VideosInput};
