use clap::Subcommand;
use relatos_export::VideoMeta;
use relatos_search::{
    ensure_db, filter_stories, search, stats, upsert_story, upsert_video, Connection, StoryFilter,
    StoryHit, StoryRecord, VideoRecord,
};
use relatos_store::{DataPaths, PipelineStatus};
use relatos_transcript::VideosInput;
use std::path::Path;

use crate::workspace;

#[derive(Subcommand)]
pub enum DbCmd {
    /// Load every verified story from the segmentation files into the database
    Sync,
    /// Full-text search over titles, text and summaries
    Search {
        /// FTS5 query (e.g. "luz campo" or "cementerio OR ruta")
        query: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stories by category, narrator or wtf score
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        narrator: Option<String>,
        /// Minimum wtf score
        #[arg(long)]
        min_wtf: Option<f64>,
        /// Maximum wtf score
        #[arg(long)]
        max_wtf: Option<f64>,
        /// Only human-verified stories
        #[arg(long)]
        verified: bool,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Database totals
    Stats,
}

pub fn run(cmd: DbCmd, repo_root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    let conn = ensure_db(&paths.db_file)?;
    match cmd {
        DbCmd::Sync => {
            let (videos, stories) = sync(&paths, &conn)?;
            println!("Synced {stories} stories from {videos} videos into {}", paths.display(&paths.db_file));
        }
        DbCmd::Search { query, limit, json } => {
            print_hits(&search(&conn, &query, limit)?, json)?;
        }
        DbCmd::List {
            category,
            subcategory,
            narrator,
            min_wtf,
            max_wtf,
            verified,
            limit,
            json,
        } => {
            let filter = StoryFilter {
                category,
                subcategory,
                narrator,
                wtf_min: min_wtf,
                wtf_max: max_wtf,
                verified_only: verified,
                limit,
            };
            print_hits(&filter_stories(&conn, &filter)?, json)?;
        }
        DbCmd::Stats => {
            let s = stats(&conn)?;
            println!("Videos:   {}", s.videos);
            println!("Stories:  {}", s.stories);
            println!("Verified: {}", s.verified);
            if let Some(mean) = s.mean_wtf {
                println!("Mean wtf: {mean:.2}");
            }
            if !s.by_category.is_empty() {
                println!("\nBy category:");
                for (category, count) in &s.by_category {
                    println!("  {category}: {count}");
                }
            }
        }
    }
    Ok(())
}

/// Upsert every stored video and its verified stories. Returns
/// `(videos, stories)` written.
fn sync(paths: &DataPaths, conn: &Connection) -> anyhow::Result<(usize, usize)> {
    let store = paths.results();
    let status = PipelineStatus::load(&paths.status_json)?;
    let inputs = VideosInput::load(&paths.videos_input_json)?;
    let (mut videos, mut stories) = (0, 0);
    for id in store.ids()? {
        let Some(result) = store.load(&id)? else {
            continue;
        };
        let meta = VideoMeta::lookup(&id, &status, &inputs);
        let url = inputs
            .find(&id)
            .map(|v| v.url.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={id}"));
        upsert_video(
            conn,
            &VideoRecord {
                video_id: id.clone(),
                url,
                title: Some(meta.title).filter(|t| !t.is_empty()),
                broadcast_date: Some(meta.broadcast_date).filter(|d| !d.is_empty()),
                duration_minutes: None,
            },
        )?;
        videos += 1;
        for span in &result.spans {
            if let Some(record) = StoryRecord::from_verified_span(&id, span) {
                upsert_story(conn, &record)?;
                stories += 1;
            }
        }
    }
    tracing::info!(videos, stories, "story database synced");
    Ok((videos, stories))
}

fn print_hits(hits: &[StoryHit], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(hits)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("No stories found.");
        return Ok(());
    }
    for hit in hits {
        let score = hit.wtf_score.map(|s| format!("{s:.2}")).unwrap_or_else(|| "-".into());
        println!(
            "[{score}] {} ({})",
            hit.title.as_deref().unwrap_or("(untitled)"),
            hit.category.as_deref().unwrap_or("?")
        );
        println!(
            "       {}",
            relatos_core::youtube_url(&hit.video_id, hit.start)
        );
        if !hit.snippet.is_empty() {
            println!("       {}", hit.snippet);
        }
    }
    Ok(())
}
