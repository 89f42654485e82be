use anyhow::Context;
use relatos_core::timefmt::now_rfc3339;
use relatos_core::StorySpan;
use rusqlite::{params, Connection, OptionalExtension};

/// Classifier tag for rows that came from human review.
pub const CLASSIFIED_BY_HUMAN: &str = "human";

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub url: String,
    pub title: Option<String>,
    pub broadcast_date: Option<String>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryRecord {
    pub video_id: String,
    pub start: f64,
    pub end: f64,
    pub title: Option<String>,
    pub text: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub narrator: Option<String>,
    pub wtf_score: Option<f64>,
    pub is_ad: bool,
    pub classified_by: String,
    pub human_verified: bool,
    pub classified_at: Option<String>,
}

impl StoryRecord {
    /// Row for a span confirmed as a story by a reviewer.
    pub fn from_verified_span(video_id: &str, span: &StorySpan) -> Option<Self> {
        let c = span.classification.as_ref()?;
        if !(c.human_verified && c.is_story) {
            return None;
        }
        Some(Self {
            video_id: video_id.to_string(),
            start: span.start,
            end: span.end,
            title: c.title.clone(),
            text: span.text.clone(),
            summary: c.summary.clone(),
            category: c.category.map(|v| v.as_str().to_string()),
            subcategory: c.subcategory.clone(),
            narrator: c.narrator.map(|v| v.as_str().to_string()),
            wtf_score: c.wtf_score,
            is_ad: false,
            classified_by: CLASSIFIED_BY_HUMAN.to_string(),
            human_verified: true,
            classified_at: c.reviewed_at.clone(),
        })
    }
}

/// Insert or update a video row, keeping its story count.
pub fn upsert_video(conn: &Connection, video: &VideoRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO videos (video_id, url, title, broadcast_date, duration_minutes, processed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT(video_id) DO UPDATE SET \
           url = excluded.url, \
           title = COALESCE(excluded.title, videos.title), \
           broadcast_date = COALESCE(excluded.broadcast_date, videos.broadcast_date), \
           duration_minutes = COALESCE(excluded.duration_minutes, videos.duration_minutes), \
           processed_at = excluded.processed_at",
        params![
            video.video_id,
            video.url,
            video.title,
            video.broadcast_date,
            video.duration_minutes,
            now_rfc3339(),
        ],
    )
    .context("upsert video")?;
    Ok(())
}

/// Insert a story, or update the one already stored for `(video_id, start)`.
/// Refreshes the owning video's story count. Returns the story row id.
pub fn upsert_story(conn: &Connection, story: &StoryRecord) -> anyhow::Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO stories (video_id, start_secs, end_secs, title, text, summary, category, \
         subcategory, narrator, wtf_score, is_ad, classified_by, human_verified, classified_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) \
         ON CONFLICT(video_id, start_secs) DO UPDATE SET \
           end_secs = excluded.end_secs, title = excluded.title, text = excluded.text, \
           summary = excluded.summary, category = excluded.category, \
           subcategory = excluded.subcategory, narrator = excluded.narrator, \
           wtf_score = excluded.wtf_score, is_ad = excluded.is_ad, \
           classified_by = excluded.classified_by, human_verified = excluded.human_verified, \
           classified_at = excluded.classified_at",
        params![
            story.video_id,
            story.start,
            story.end,
            story.title,
            story.text,
            story.summary,
            story.category,
            story.subcategory,
            story.narrator,
            story.wtf_score,
            story.is_ad,
            story.classified_by,
            story.human_verified,
            story.classified_at,
        ],
    )
    .context("upsert story")?;
    let id: i64 = tx.query_row(
        "SELECT id FROM stories WHERE video_id = ?1 AND start_secs = ?2",
        params![story.video_id, story.start],
        |row| row.get(0),
    )?;
    tx.execute(
        "UPDATE videos SET story_count = (SELECT COUNT(*) FROM stories WHERE video_id = ?1) \
         WHERE video_id = ?1",
        params![story.video_id],
    )?;
    tx.commit()?;
    Ok(id)
}

pub fn story_count(conn: &Connection, video_id: &str) -> anyhow::Result<Option<i64>> {
    let count = conn
        .query_row(
            "SELECT story_count FROM videos WHERE video_id = ?1",
            params![video_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(count)
}
