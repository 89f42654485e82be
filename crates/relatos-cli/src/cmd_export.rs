use relatos_export::{export_web, FeedStats};
use std::path::Path;

use crate::workspace;

/// `relatos export`
pub fn execute(repo_root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    let feed = export_web(&paths)?;
    if feed.total == 0 {
        println!("No reviewed stories to export yet. Run `relatos review <id>` first.");
        return Ok(());
    }
    println!(
        "Exported {} stories to {}\n",
        feed.total,
        paths.display(&paths.web_export_json)
    );
    print!("{}", FeedStats::from_feed(&feed).render());
    Ok(())
}
