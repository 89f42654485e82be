pub mod schema;
pub mod search;
pub mod stories;

pub use schema::{ensure_db, ensure_db_memory};
pub use search::{filter_stories, search, stats, DbStats, StoryFilter, StoryHit};
pub use stories::{story_count, upsert_story, upsert_video, StoryRecord, VideoRecord};
pub use rusqlite::Connection;
