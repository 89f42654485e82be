use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;

/// A story row joined with its video.
#[derive(Debug, Clone, Serialize)]
pub struct StoryHit {
    pub id: i64,
    pub video_id: String,
    pub start: f64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub wtf_score: Option<f64>,
    pub video_title: Option<String>,
    pub broadcast_date: Option<String>,
    /// Highlighted excerpt; empty for filtered listings.
    pub snippet: String,
    /// BM25 score (lower is better); 0 for filtered listings.
    pub rank: f64,
}

/// Full-text search over title, text and summary, best matches first.
pub fn search(conn: &Connection, query: &str, limit: usize) -> anyhow::Result<Vec<StoryHit>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.video_id, s.start_secs, s.title, s.category, s.wtf_score, \
         v.title, v.broadcast_date, \
         snippet(stories_fts, 1, '«', '»', '...', 24), bm25(stories_fts) AS relevance \
         FROM stories_fts \
         JOIN stories s ON stories_fts.rowid = s.id \
         LEFT JOIN videos v ON s.video_id = v.video_id \
         WHERE stories_fts MATCH ?1 \
         ORDER BY relevance \
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![query, limit as i64], map_hit)?;
    let mut hits = Vec::new();
    for row in rows {
        hits.push(row?);
    }
    Ok(hits)
}

#[derive(Debug, Clone, Default)]
pub struct StoryFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub narrator: Option<String>,
    pub wtf_min: Option<f64>,
    pub wtf_max: Option<f64>,
    pub verified_only: bool,
    pub limit: usize,
}

/// Non-ad stories matching every set filter, highest wtf score first.
pub fn filter_stories(conn: &Connection, filter: &StoryFilter) -> anyhow::Result<Vec<StoryHit>> {
    let mut sql = String::from(
        "SELECT s.id, s.video_id, s.start_secs, s.title, s.category, s.wtf_score, \
         v.title, v.broadcast_date, '', 0.0 \
         FROM stories s \
         LEFT JOIN videos v ON s.video_id = v.video_id \
         WHERE s.is_ad = 0",
    );
    let mut args: Vec<Value> = Vec::new();
    let text_filters = [
        ("s.category", &filter.category),
        ("s.subcategory", &filter.subcategory),
        ("s.narrator", &filter.narrator),
    ];
    for (column, value) in text_filters {
        if let Some(v) = value {
            args.push(Value::Text(v.clone()));
            sql.push_str(&format!(" AND {column} = ?{}", args.len()));
        }
    }
    if let Some(min) = filter.wtf_min {
        args.push(Value::Real(min));
        sql.push_str(&format!(" AND s.wtf_score >= ?{}", args.len()));
    }
    if let Some(max) = filter.wtf_max {
        args.push(Value::Real(max));
        sql.push_str(&format!(" AND s.wtf_score <= ?{}", args.len()));
    }
    if filter.verified_only {
        sql.push_str(" AND s.human_verified = 1");
    }
    let limit = if filter.limit == 0 { 50 } else { filter.limit };
    args.push(Value::Integer(limit as i64));
    sql.push_str(&format!(" ORDER BY s.wtf_score DESC, s.id LIMIT ?{}", args.len()));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args), map_hit)?;
    let mut hits = Vec::new();
    for row in rows {
        hits.push(row?);
    }
    Ok(hits)
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DbStats {
    pub videos: i64,
    pub stories: i64,
    pub verified: i64,
    pub by_category: Vec<(String, i64)>,
    pub mean_wtf: Option<f64>,
}

pub fn stats(conn: &Connection) -> anyhow::Result<DbStats> {
    let videos = conn.query_row("SELECT COUNT(*) FROM videos", [], |r| r.get(0))?;
    let stories = conn.query_row("SELECT COUNT(*) FROM stories WHERE is_ad = 0", [], |r| r.get(0))?;
    let verified = conn.query_row(
        "SELECT COUNT(*) FROM stories WHERE human_verified = 1",
        [],
        |r| r.get(0),
    )?;
    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) AS n FROM stories \
         WHERE is_ad = 0 AND category IS NOT NULL \
         GROUP BY category ORDER BY n DESC, category",
    )?;
    let by_category = stmt
        .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let mean_wtf = conn.query_row(
        "SELECT AVG(wtf_score) FROM stories WHERE wtf_score IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(DbStats {
        videos,
        stories,
        verified,
        by_category,
        mean_wtf,
    })
}

fn map_hit(row: &Row) -> rusqlite::Result<StoryHit> {
    Ok(StoryHit {
        id: row.get(0)?,
        video_id: row.get(1)?,
        start: row.get(2)?,
        title: row.get(3)?,
        category: row.get(4)?,
        wtf_score: row.get(5)?,
        video_title: row.get(6)?,
        broadcast_date: row.get(7)?,
        snippet: row.get(8)?,
        rank: row.get(9)?,
    })
}
