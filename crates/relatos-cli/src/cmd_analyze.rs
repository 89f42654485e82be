use relatos_core::timefmt::format_timestamp;
use relatos_core::{youtube_url, BoundaryCandidate, TranscriptSource};
use relatos_segment::{scan_story_starts, SCAN_MIN_GAP};
use relatos_store::{write_atomic, DataPaths};
use relatos_transcript::{render_report, ReportFormat};
use std::path::{Path, PathBuf};

use crate::workspace;

/// `relatos analyze <id>`
pub fn execute(repo_root: &Path, id: &str, format: ReportFormat, chunk: u32) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    let (path, starts) = analyze(&paths, id, format, chunk)?;
    println!("Report written to {}", paths.display(&path));
    print!("\n{}", render_starts(id, &starts));
    Ok(())
}

fn analyze(
    paths: &DataPaths,
    id: &str,
    format: ReportFormat,
    chunk: u32,
) -> anyhow::Result<(PathBuf, Vec<BoundaryCandidate>)> {
    if chunk == 0 {
        anyhow::bail!("--chunk must be at least 1 second");
    }
    let transcript = workspace::transcripts(paths).load(id)?;
    let catalog = workspace::load_catalog(paths, None)?;
    let report = render_report(&transcript, chunk, format);
    let path = paths.analysis_file(id, format.extension());
    write_atomic(&path, report.as_bytes())?;
    let starts = scan_story_starts(&transcript, &catalog);
    tracing::debug!(id, starts = starts.len(), "story start scan done");
    Ok((path, starts))
}

/// One entry per likely story start: time, pattern, context and deep link.
fn render_starts(id: &str, starts: &[BoundaryCandidate]) -> String {
    if starts.is_empty() {
        return "No likely story starts found.\n".to_string();
    }
    let mut out = format!(
        "Likely story starts ({}, at least {SCAN_MIN_GAP:.0}s apart):\n",
        starts.len()
    );
    for start in starts {
        out.push_str(&format!(
            "\n[{}] {}\n  {}\n  {}\n",
            format_timestamp(start.time),
            start.pattern_id,
            start.context,
            youtube_url(id, start.time)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relatos_core::TimedSegment;
    use relatos_transcript::{FsTranscriptSource, SubtitleFile};

    #[test]
    fn writes_report_next_to_subtitles() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::with_data_dir(tmp.path(), tmp.path().join("data"));
        FsTranscriptSource::new(&paths.subtitles_dir)
            .save(&SubtitleFile::new(
                "vid",
                "es",
                vec![
                    TimedSegment::new(0.0, 4.0, "buenas noches"),
                    TimedSegment::new(75.0, 4.0, "me escribe ana"),
                ],
            ))
            .unwrap();

        let (path, starts) = analyze(&paths, "vid", ReportFormat::Md, 60).unwrap();
        assert_eq!(path, paths.subtitles_dir.join("vid_analisis.md"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("me escribe ana"));
        assert!(text.contains("t=60s"));

        // The first segment sees "me escribe" one ahead; 75 is far enough
        // from it to be listed too.
        let times: Vec<f64> = starts.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 75.0]);
        assert!(starts.iter().all(|s| s.pattern_id == "writes-to-me"));

        // The report is not picked up as a transcript.
        let ids = FsTranscriptSource::new(&paths.subtitles_dir).available_ids().unwrap();
        assert_eq!(ids, vec!["vid".to_string()]);
    }

    #[test]
    fn missing_transcript_and_zero_chunk_fail() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::with_data_dir(tmp.path(), tmp.path().join("data"));
        assert!(analyze(&paths, "nope", ReportFormat::Txt, 60).is_err());
        assert!(analyze(&paths, "nope", ReportFormat::Txt, 0).is_err());
    }

    #[test]
    fn story_starts_listing_links_each_start() {
        let starts = vec![BoundaryCandidate {
            time: 75.0,
            pattern_id: "writes-to-me".into(),
            context: "me escribe ana".into(),
        }];
        let text = render_starts("vid", &starts);
        assert!(text.starts_with("Likely story starts (1, at least 30s apart):"));
        assert!(text.contains("[01:15] writes-to-me"));
        assert!(text.contains("  me escribe ana\n"));
        assert!(text.contains("https://www.youtube.com/watch?v=vid&t=75s"));
        assert_eq!(render_starts("vid", &[]), "No likely story starts found.\n");
    }
}
