mod cmd_analyze;
mod cmd_catalog;
mod cmd_config;
mod cmd_db;
mod cmd_export;
mod cmd_review;
mod cmd_segment;
mod cmd_status;
mod workspace;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "relatos",
    version,
    about = "Find where stories start in talk-radio transcripts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment transcripts into candidate story spans
    Segment {
        /// Transcript ids (default: every id with a subtitle file)
        ids: Vec<String>,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
        /// Pattern catalog file (YAML or JSON) to use instead of the default
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,
        #[command(flatten)]
        overrides: workspace::ConfigOverrides,
    },
    /// Show where every video stands in the pipeline
    Status,
    /// Review the detected spans of one transcript
    Review {
        /// Transcript id
        id: String,
    },
    /// Export verified stories to the web feed
    Export,
    /// Write a timestamped reading report and list likely story starts
    Analyze {
        /// Transcript id
        id: String,
        /// Report format: txt or md
        #[arg(long, default_value = "txt")]
        format: relatos_transcript::ReportFormat,
        /// Seconds of text per report chunk
        #[arg(long, default_value_t = relatos_transcript::DEFAULT_CHUNK_SECONDS)]
        chunk: u32,
    },
    /// Inspect the boundary pattern catalog
    Catalog {
        #[command(subcommand)]
        cmd: cmd_catalog::CatalogCmd,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
    /// Story database: sync, search and stats
    Db {
        #[command(subcommand)]
        cmd: cmd_db::DbCmd,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("relatos=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Segment {
            ids,
            json,
            catalog,
            overrides,
        } => cmd_segment::execute(&repo_root, &ids, json, catalog.as_deref(), &overrides),
        Command::Status => cmd_status::execute(&repo_root),
        Command::Review { id } => cmd_review::execute(&repo_root, &id),
        Command::Export => cmd_export::execute(&repo_root),
        Command::Analyze { id, format, chunk } => {
            cmd_analyze::execute(&repo_root, &id, format, chunk)
        }
        Command::Catalog { cmd } => cmd_catalog::run(cmd, &repo_root),
        Command::Config { cmd } => cmd_config::run(cmd, &repo_root),
        Command::Db { cmd } => cmd_db::run(cmd, &repo_root),
    }
}
