use rusqlite::Connection;
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS videos (
        video_id TEXT PRIMARY KEY,
        url TEXT NOT NULL,
        title TEXT,
        broadcast_date TEXT,
        duration_minutes INTEGER,
        processed_at TEXT,
        story_count INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS stories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        video_id TEXT NOT NULL REFERENCES videos(video_id),
        start_secs REAL NOT NULL,
        end_secs REAL,
        title TEXT,
        text TEXT NOT NULL,
        summary TEXT,
        category TEXT,
        subcategory TEXT,
        narrator TEXT,
        wtf_score REAL,
        is_ad INTEGER NOT NULL DEFAULT 0,
        classified_by TEXT,
        human_verified INTEGER NOT NULL DEFAULT 0,
        classified_at TEXT,
        UNIQUE (video_id, start_secs)
    );

    CREATE VIRTUAL TABLE IF NOT EXISTS stories_fts USING fts5(
        title,
        text,
        summary,
        content = 'stories',
        content_rowid = 'id',
        tokenize = 'unicode61 remove_diacritics 2'
    );

    CREATE TRIGGER IF NOT EXISTS stories_ai AFTER INSERT ON stories BEGIN
        INSERT INTO stories_fts(rowid, title, text, summary)
        VALUES (new.id, new.title, new.text, new.summary);
    END;

    CREATE TRIGGER IF NOT EXISTS stories_ad AFTER DELETE ON stories BEGIN
        INSERT INTO stories_fts(stories_fts, rowid, title, text, summary)
        VALUES ('delete', old.id, old.title, old.text, old.summary);
    END;

    CREATE TRIGGER IF NOT EXISTS stories_au AFTER UPDATE ON stories BEGIN
        INSERT INTO stories_fts(stories_fts, rowid, title, text, summary)
        VALUES ('delete', old.id, old.title, old.text, old.summary);
        INSERT INTO stories_fts(rowid, title, text, summary)
        VALUES (new.id, new.title, new.text, new.summary);
    END;

    CREATE INDEX IF NOT EXISTS idx_stories_video ON stories(video_id);
    CREATE INDEX IF NOT EXISTS idx_stories_category ON stories(category);
    CREATE INDEX IF NOT EXISTS idx_stories_wtf ON stories(wtf_score);
    CREATE INDEX IF NOT EXISTS idx_stories_verified ON stories(human_verified);
";

/// Open (or create) the story database and ensure the schema exists.
pub fn ensure_db(db_path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.execute_batch(SCHEMA)?;
    tracing::debug!(path = %db_path.display(), "story database ready");
    Ok(conn)
}

/// In-memory database with the same schema (for testing).
pub fn ensure_db_memory() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
