use relatos_core::timefmt::format_timestamp;
use relatos_core::{youtube_url, Transcript};
use std::fmt::Write as _;
use std::str::FromStr;

pub const DEFAULT_CHUNK_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Txt,
    Md,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Txt => "txt",
            ReportFormat::Md => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "txt" => Ok(ReportFormat::Txt),
            "md" | "markdown" => Ok(ReportFormat::Md),
            other => anyhow::bail!("unknown report format '{other}' (expected txt or md)"),
        }
    }
}

/// Text of every segment starting in `[start, start + chunk)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub start: f64,
    pub text: String,
}

/// Group segments into fixed chunks. Chunks with no segments are omitted.
pub fn chunk_transcript(transcript: &Transcript, chunk_seconds: u32) -> Vec<Chunk> {
    let size = f64::from(chunk_seconds.max(1));
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current: Option<(u64, Vec<&str>)> = None;
    for seg in &transcript.segments {
        let index = (seg.start.max(0.0) / size).floor() as u64;
        match &mut current {
            Some((i, texts)) if *i == index => texts.push(seg.text.as_str()),
            _ => {
                if let Some((i, texts)) = current.take() {
                    chunks.push(Chunk {
                        start: i as f64 * size,
                        text: texts.join(" "),
                    });
                }
                current = Some((index, vec![seg.text.as_str()]));
            }
        }
    }
    if let Some((i, texts)) = current {
        chunks.push(Chunk {
            start: i as f64 * size,
            text: texts.join(" "),
        });
    }
    chunks
}

/// Readable dump of a transcript, chunked with timestamps and deep links,
/// for finding new boundary phrases by hand.
pub fn render_report(transcript: &Transcript, chunk_seconds: u32, format: ReportFormat) -> String {
    let chunks = chunk_transcript(transcript, chunk_seconds);
    let duration = format_timestamp(transcript.duration());
    let mut out = String::new();
    match format {
        ReportFormat::Txt => {
            let _ = writeln!(out, "Analysis of: {}", transcript.id);
            let _ = writeln!(out, "Duration: {duration}");
            let _ = writeln!(out, "Segments: {}", transcript.len());
            let _ = writeln!(out, "Chunks of {chunk_seconds} seconds");
            let _ = writeln!(out, "{}", "=".repeat(70));
            for chunk in &chunks {
                let _ = writeln!(
                    out,
                    "\n[{}] ({})",
                    format_timestamp(chunk.start),
                    youtube_url(&transcript.id, chunk.start)
                );
                let _ = writeln!(out, "{}", "-".repeat(50));
                let _ = writeln!(out, "{}", chunk.text);
            }
        }
        ReportFormat::Md => {
            let _ = writeln!(out, "# Analysis of `{}`\n", transcript.id);
            let _ = writeln!(out, "- Duration: {duration}");
            let _ = writeln!(out, "- Segments: {}", transcript.len());
            let _ = writeln!(out, "- Chunks of {chunk_seconds} seconds");
            for chunk in &chunks {
                let _ = writeln!(
                    out,
                    "\n## [{}]({})\n\n{}",
                    format_timestamp(chunk.start),
                    youtube_url(&transcript.id, chunk.start),
                    chunk.text
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relatos_core::TimedSegment;

    fn transcript() -> Transcript {
        Transcript::new(
            "abc",
            vec![
                TimedSegment::new(0.0, 2.0, "hola gente"),
                TimedSegment::new(10.0, 2.0, "bienvenidos"),
                TimedSegment::new(130.0, 2.0, "me escribe juan"),
                TimedSegment::new(3700.0, 5.0, "cierre"),
            ],
        )
    }

    #[test]
    fn chunks_skip_empty_ranges() {
        let chunks = chunk_transcript(&transcript(), 60);
        let starts: Vec<f64> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.0, 120.0, 3660.0]);
        assert_eq!(chunks[0].text, "hola gente bienvenidos");
    }

    #[test]
    fn txt_report_has_header_and_links() {
        let report = render_report(&transcript(), 60, ReportFormat::Txt);
        assert!(report.starts_with("Analysis of: abc\nDuration: 01:01:45\n"));
        assert!(report.contains("[02:00] (https://www.youtube.com/watch?v=abc&t=120s)"));
        assert!(report.contains("[01:01:00]"));
    }

    #[test]
    fn md_report_uses_headings() {
        let report = render_report(&transcript(), 60, ReportFormat::Md);
        assert!(report.starts_with("# Analysis of `abc`"));
        assert!(report.contains("## [00:00](https://www.youtube.com/watch?v=abc&t=0s)"));
    }

    #[test]
    fn format_parses() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Md);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn empty_transcript_report_is_header_only() {
        let report = render_report(&Transcript::new("e", vec![]), 60, ReportFormat::Txt);
        assert!(report.contains("Duration: 00:00"));
        assert!(!report.contains('['));
    }
}
