use clap::Subcommand;
use relatos_segment::{PatternCatalog, PatternKind};
use std::path::{Path, PathBuf};

use crate::workspace;

#[derive(Subcommand)]
pub enum CatalogCmd {
    /// List patterns in match order
    List {
        /// Catalog file to inspect instead of the default
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show which patterns match a piece of text
    Test {
        /// Text to match (case-insensitive)
        text: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the active catalog as YAML (a starting point for data/catalog.yaml)
    Dump {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

pub fn run(cmd: CatalogCmd, repo_root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    match cmd {
        CatalogCmd::List { catalog } => {
            let catalog = workspace::load_catalog(&paths, catalog.as_deref())?;
            print!("{}", render_list(&catalog));
        }
        CatalogCmd::Test { text, catalog } => {
            let catalog = workspace::load_catalog(&paths, catalog.as_deref())?;
            print!("{}", render_test(&catalog, &text));
        }
        CatalogCmd::Dump { catalog } => {
            let catalog = workspace::load_catalog(&paths, catalog.as_deref())?;
            print!("{}", catalog.to_yaml()?);
        }
    }
    Ok(())
}

fn kind_label(kind: PatternKind) -> &'static str {
    match kind {
        PatternKind::Start => "start",
        PatternKind::End => "end",
    }
}

fn render_list(catalog: &PatternCatalog) -> String {
    let mut out = String::new();
    for (i, p) in catalog.patterns().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<5}  {:<20}  {}\n",
            i + 1,
            kind_label(p.kind),
            p.id,
            p.source
        ));
    }
    out.push_str(&format!(
        "\n{} patterns, digest {}\n",
        catalog.patterns().len(),
        catalog.digest()
    ));
    out
}

fn render_test(catalog: &PatternCatalog, text: &str) -> String {
    let matches: Vec<_> = catalog.patterns().iter().filter(|p| p.is_match(text)).collect();
    if matches.is_empty() {
        return "No pattern matches.\n".to_string();
    }
    let mut out = String::new();
    for p in &matches {
        out.push_str(&format!("  {:<5}  {}\n", kind_label(p.kind), p.id));
    }
    if let Some(first) = catalog.first_match(PatternKind::Start, text) {
        out.push_str(&format!("Boundary pattern: {}\n", first.id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_shows_order_and_digest() {
        let catalog = PatternCatalog::builtin();
        let text = render_list(&catalog);
        assert!(text.starts_with("  1  start  live-greeting"));
        assert!(text.contains(&catalog.digest()));
    }

    #[test]
    fn test_reports_first_start_match() {
        let catalog = PatternCatalog::builtin();
        let text = render_test(&catalog, "Hola Héctor, me escribe Juan. Un abrazo");
        assert!(text.contains("hello-hector"));
        assert!(text.contains("writes-to-me"));
        assert!(text.contains("end    big-hug"));
        assert!(text.contains("Boundary pattern: writes-to-me"));
        assert_eq!(render_test(&catalog, "nada que ver"), "No pattern matches.\n");
    }
}
