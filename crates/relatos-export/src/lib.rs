//! Web feed of human-verified stories.

mod feed;
mod stats;

pub use feed::{
    build_feed, export_web, load_feed, web_story, write_feed, VideoMeta, WebFeed, WebStory,
    DEFAULT_SUBCATEGORY, DEFAULT_TITLE, DEFAULT_WTF_SCORE,
};
pub use stats::{FeedStats, TOP_N};
