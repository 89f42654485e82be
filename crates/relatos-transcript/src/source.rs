use anyhow::Context;
use relatos_core::{Result, SegmentError, Transcript, TranscriptSource};
use relatos_store::write_atomic;
use std::path::{Path, PathBuf};

use crate::subtitle::{parse_subtitles, SubtitleFile};

/// Transcripts stored as `<dir>/<video_id>.json` subtitle files.
#[derive(Debug, Clone)]
pub struct FsTranscriptSource {
    dir: PathBuf,
}

impl FsTranscriptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Ids that have a subtitle file, sorted. Analysis reports are skipped.
    pub fn available_ids(&self) -> anyhow::Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("listing {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if !stem.ends_with("_analisis") => ids.push(stem.to_string()),
                _ => {}
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Write a subtitle document atomically; returns its path.
    pub fn save(&self, file: &SubtitleFile) -> anyhow::Result<PathBuf> {
        let path = self.path_for(&file.video_id);
        let data = serde_json::to_string_pretty(file)?;
        write_atomic(&path, data.as_bytes())
            .with_context(|| format!("saving subtitles: {}", path.display()))?;
        Ok(path)
    }
}

impl TranscriptSource for FsTranscriptSource {
    fn load(&self, id: &str) -> Result<Transcript> {
        let path = self.path_for(id);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SegmentError::MissingInput {
                    id: id.to_string(),
                    path,
                })
            }
            Err(source) => {
                return Err(SegmentError::ReadTranscript {
                    id: id.to_string(),
                    source,
                })
            }
        };
        let parsed = parse_subtitles(id, &content)?;
        for skipped in &parsed.skipped {
            tracing::warn!(error = %skipped, "segment skipped");
        }
        tracing::debug!(
            id,
            read = parsed.records_read,
            kept = parsed.transcript.len(),
            "transcript loaded"
        );
        Ok(parsed.transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relatos_core::TimedSegment;

    #[test]
    fn missing_file_is_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FsTranscriptSource::new(tmp.path());
        match source.load("nope") {
            Err(SegmentError::MissingInput { id, path }) => {
                assert_eq!(id, "nope");
                assert!(path.ends_with("nope.json"));
            }
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FsTranscriptSource::new(tmp.path().join("subtitulos"));
        let file = SubtitleFile::new(
            "abc",
            "es",
            vec![
                TimedSegment::new(0.0, 2.0, "hola gente"),
                TimedSegment::new(32.0, 3.0, "me escribe juan"),
            ],
        );
        let path = source.save(&file).unwrap();
        assert!(path.ends_with("abc.json"));

        let t = source.load("abc").unwrap();
        assert_eq!(t.id, "abc");
        assert_eq!(t.len(), 2);
        assert_eq!(t.segments[1].text, "me escribe juan");
    }

    #[test]
    fn load_skips_bad_records() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FsTranscriptSource::new(tmp.path());
        std::fs::write(
            source.path_for("v"),
            r#"{"video_id":"v","segments":[{"text":"sin inicio"},{"start":1,"duration":1,"text":"ok"}]}"#,
        )
        .unwrap();
        assert_eq!(source.load("v").unwrap().len(), 1);
    }

    #[test]
    fn available_ids_skips_reports_and_other_files() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FsTranscriptSource::new(tmp.path());
        for name in ["b.json", "a.json", "a_analisis.txt", "c_analisis.json", "notes.md"] {
            std::fs::write(tmp.path().join(name), "{}").unwrap();
        }
        assert_eq!(source.available_ids().unwrap(), vec!["a", "b"]);
    }
}
