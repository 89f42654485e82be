use serde::{Deserialize, Serialize};

use crate::config::SegmentationConfig;
use crate::taxonomy::{Category, Narrator};

/// Method tag stamped on results produced by the heuristic segmenter.
pub const METHOD_HEURISTICS_V1: &str = "heuristics_v1";

/// Opaque transcript identifier (a YouTube video id in practice).
pub type TranscriptId = String;

/// One timed line of subtitle text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimedSegment {
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
    pub text: String,
}

impl TimedSegment {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A full transcript: segments ordered by `start` ascending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    pub id: TranscriptId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub segments: Vec<TimedSegment>,
}

impl Transcript {
    pub fn new(id: impl Into<String>, segments: Vec<TimedSegment>) -> Self {
        Self {
            id: id.into(),
            language: None,
            segments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// End time of the last segment, or 0 for an empty transcript.
    pub fn duration(&self) -> f64 {
        self.segments.last().map(TimedSegment::end).unwrap_or(0.0)
    }
}

/// A point where a new story is believed to start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryCandidate {
    pub time: f64,
    pub pattern_id: String,
    /// Diagnostic snippet of the matching window. Not used downstream.
    pub context: String,
}

/// Human (or external) labels attached to a span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Classification {
    pub is_story: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrator: Option<Narrator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wtf_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub human_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

impl Classification {
    /// A verified "not a story" label.
    pub fn discarded(reviewed_at: impl Into<String>) -> Self {
        Self {
            is_story: false,
            human_verified: true,
            reviewed_at: Some(reviewed_at.into()),
            ..Self::default()
        }
    }
}

/// A contiguous time range believed to hold one story.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorySpan {
    pub sequence_id: u32,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub matched_pattern: String,
    pub text: String,
    #[serde(default)]
    pub classification: Option<Classification>,
}

impl StorySpan {
    pub fn is_verified(&self) -> bool {
        self.classification
            .as_ref()
            .map(|c| c.human_verified)
            .unwrap_or(false)
    }

    /// Verified and confirmed to be a real story.
    pub fn is_verified_story(&self) -> bool {
        self.classification
            .as_ref()
            .map(|c| c.human_verified && c.is_story)
            .unwrap_or(false)
    }
}

/// All spans built for one transcript by one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentationResult {
    pub transcript_id: TranscriptId,
    pub generated_at: String,
    pub method: String,
    #[serde(default)]
    pub catalog_digest: String,
    #[serde(default)]
    pub config: SegmentationConfig,
    pub total_spans: usize,
    pub spans: Vec<StorySpan>,
}

impl SegmentationResult {
    pub fn verified_count(&self) -> usize {
        self.spans.iter().filter(|s| s.is_verified()).count()
    }
}

/// Deep link into the source video at `start` seconds.
pub fn youtube_url(video_id: &str, start: f64) -> String {
    format!(
        "https://www.youtube.com/watch?v={video_id}&t={}s",
        start.max(0.0) as u64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(classification: Option<Classification>) -> StorySpan {
        StorySpan {
            sequence_id: 1,
            start: 10.0,
            end: 20.0,
            duration: 10.0,
            matched_pattern: "writes-to-me".into(),
            text: "me escribe juan".into(),
            classification,
        }
    }

    #[test]
    fn transcript_duration_uses_last_segment_end() {
        let t = Transcript::new(
            "v1",
            vec![
                TimedSegment::new(0.0, 2.0, "a"),
                TimedSegment::new(5.0, 3.5, "b"),
            ],
        );
        assert_eq!(t.duration(), 8.5);
        assert_eq!(Transcript::new("v2", vec![]).duration(), 0.0);
    }

    #[test]
    fn segment_duration_defaults_to_zero() {
        let seg: TimedSegment = serde_json::from_str(r#"{"start": 3.2, "text": "hola"}"#).unwrap();
        assert_eq!(seg.duration, 0.0);
        assert_eq!(seg.end(), 3.2);
    }

    #[test]
    fn verification_flags() {
        assert!(!span(None).is_verified());
        let discarded = span(Some(Classification::discarded("2026-01-01T00:00:00Z")));
        assert!(discarded.is_verified());
        assert!(!discarded.is_verified_story());
        let confirmed = span(Some(Classification {
            is_story: true,
            human_verified: true,
            ..Classification::default()
        }));
        assert!(confirmed.is_verified_story());
    }

    #[test]
    fn null_classification_deserializes() {
        let json = r#"{"sequence_id":1,"start":1.0,"end":2.0,"duration":1.0,
            "matched_pattern":"p","text":"t","classification":null}"#;
        let s: StorySpan = serde_json::from_str(json).unwrap();
        assert!(s.classification.is_none());
    }

    #[test]
    fn youtube_url_truncates_seconds() {
        assert_eq!(
            youtube_url("abc123", 95.7),
            "https://www.youtube.com/watch?v=abc123&t=95s"
        );
    }
}
